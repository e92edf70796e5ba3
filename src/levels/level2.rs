// Level 2 definition
// This file contains LEVEL2_PAIRS and the hand-written level 2 lesson / quiz.
use super::{LevelDefinition, Quiz, pairs_from};

pub const LEVEL2_PAIRS: [(&str, &str); 4] = [
    ("Base", "An Ethereum layer 2 network incubated by Coinbase"),
    ("Farcaster", "A decentralized social protocol"),
    ("Cast", "A post published on Farcaster"),
    ("Mini App", "A small web app that runs inside a Farcaster client"),
];

pub fn level2() -> LevelDefinition {
    LevelDefinition {
        number: 2,
        theme: "Base & Farcaster".into(),
        lesson: "Base settles to Ethereum while keeping fees low. Farcaster clients can \
                 embed mini apps like this one, right next to the casts in your feed."
            .into(),
        pairs: pairs_from(&LEVEL2_PAIRS),
        quiz: Quiz {
            question: "Which network is an Ethereum layer 2 built by Coinbase?".into(),
            options: vec![
                "Farcaster".into(),
                "Base".into(),
                "Bitcoin".into(),
                "Cast".into(),
            ],
            answer: 1,
        },
    }
}
