// Level 1 definition
// This file contains LEVEL1_PAIRS and the hand-written level 1 lesson / quiz.
use super::{LevelDefinition, Quiz, pairs_from};

pub const LEVEL1_PAIRS: [(&str, &str); 4] = [
    ("Block", "A batch of transactions linked to the one before it"),
    ("Wallet", "Holds the keys that control your on-chain assets"),
    ("Gas", "The fee paid to have a transaction processed"),
    ("Transaction", "A signed instruction that changes on-chain state"),
];

pub fn level1() -> LevelDefinition {
    LevelDefinition {
        number: 1,
        theme: "Blockchain Basics".into(),
        lesson: "A blockchain is a shared ledger. Transactions are grouped into blocks, \
                 every block points at the previous one, and your wallet signs what you send."
            .into(),
        pairs: pairs_from(&LEVEL1_PAIRS),
        quiz: Quiz {
            question: "What do you pay to get a transaction processed?".into(),
            options: vec!["Gas".into(), "Block".into(), "Wallet".into(), "Hash".into()],
            answer: 0,
        },
    }
}
