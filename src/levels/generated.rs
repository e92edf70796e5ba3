// Templated levels 3..=20.
// Each level takes a theme from THEMES and a consecutive window of GLOSSARY
// entries; the window start moves with the level number so neighbouring
// levels overlap a little but never repeat exactly.
use super::{LevelDefinition, Pair, Quiz, pair_count};

/// (theme, lesson) for levels 3..=20, index 0 holding level 3.
pub static THEMES: [(&str, &str); 18] = [
    ("Smart Contracts", "Smart contracts are programs stored on-chain that run exactly as written."),
    ("Tokens", "Tokens represent value or membership and move between wallets like coins."),
    ("Collectibles", "NFTs are unique tokens, each one distinguishable from every other."),
    ("Governance", "Communities can vote on-chain to steer protocols and treasuries."),
    ("DeFi", "Decentralized finance rebuilds lending and trading from smart contracts."),
    ("Scaling", "Layer 2 networks batch transactions and settle them on a base layer."),
    ("Key Safety", "Whoever holds the private key controls the wallet. Guard it carefully."),
    ("Cryptography", "Hashes and signatures let anyone verify data without trusting a middleman."),
    ("Network Roles", "Nodes and validators keep the chain running and agree on its history."),
    ("Environments", "Testnets let you practice with free funds before touching mainnet."),
    ("Token Supply", "Minting creates tokens, burning destroys them, airdrops hand them out."),
    ("Trading", "Decentralized exchanges swap tokens directly against liquidity pools."),
    ("Stable Value", "Stablecoins track an outside asset so prices stay predictable."),
    ("Fees", "Gas prices are quoted in gwei, a tiny fraction of one ether."),
    ("Identity", "Human-readable names make wallet addresses easier to share."),
    ("Custody", "Shared and offline wallets trade convenience for extra safety."),
    ("Exploration", "Block explorers show every transaction that ever reached the chain."),
    ("Rewards", "Staking and providing liquidity can earn yield over time."),
];

pub static GLOSSARY: [(&str, &str); 36] = [
    ("Smart Contract", "Code deployed on-chain that runs when called"),
    ("Token", "A transferable unit of value issued by a contract"),
    ("NFT", "A token with a unique identity"),
    ("DAO", "An organization governed by token-holder votes"),
    ("DeFi", "Financial services built from smart contracts"),
    ("Staking", "Locking tokens to help secure a network"),
    ("Bridge", "Moves assets between two different chains"),
    ("Layer 2", "A network that settles its batches on a base chain"),
    ("Rollup", "Bundles many transactions into one proof or batch"),
    ("Oracle", "Feeds outside data into smart contracts"),
    ("Seed Phrase", "Words that can restore an entire wallet"),
    ("Private Key", "The secret that authorizes spending"),
    ("Public Key", "Derived from the secret and safe to share"),
    ("Hash", "A fixed-size fingerprint of any data"),
    ("Node", "A computer that stores and relays the chain"),
    ("Validator", "Proposes and attests to new blocks"),
    ("Consensus", "How the network agrees on a single history"),
    ("Mainnet", "The live network where assets have real value"),
    ("Testnet", "A practice network with worthless coins"),
    ("Faucet", "Hands out free testnet coins"),
    ("Airdrop", "Tokens distributed for free to many wallets"),
    ("Mint", "Creating new tokens"),
    ("Burn", "Permanently removing tokens from supply"),
    ("Liquidity Pool", "Paired tokens that traders swap against"),
    ("DEX", "An exchange run entirely by smart contracts"),
    ("Stablecoin", "A token pegged to an outside asset"),
    ("Gwei", "One billionth of an ether"),
    ("Nonce", "A counter that orders an account's transactions"),
    ("ENS", "Maps readable names to wallet addresses"),
    ("Multisig", "A wallet that needs several signatures"),
    ("Cold Wallet", "Keys kept offline"),
    ("Hot Wallet", "Keys kept on an internet-connected device"),
    ("Block Explorer", "A website for browsing on-chain activity"),
    ("Slippage", "Price movement between quote and execution"),
    ("Yield", "Return earned on deposited assets"),
    ("Governance Token", "Grants voting power over a protocol"),
];

/// Build level `n` from the template. Pure: the same `n` always yields the same level.
///
/// Only meaningful for 3..=20; other numbers are clamped into that window for
/// theme selection but otherwise follow the same rules.
pub fn generate_level(n: u8) -> LevelDefinition {
    let count = pair_count(n);
    let theme_idx = (n.max(3) as usize - 3) % THEMES.len();
    let (theme, lesson) = THEMES[theme_idx];

    let start = (n as usize).saturating_sub(3) * 2;
    let pairs: Vec<Pair> = (0..count)
        .map(|i| {
            let (term, definition) = GLOSSARY[(start + i) % GLOSSARY.len()];
            Pair::new(term, definition)
        })
        .collect();

    let quiz = build_quiz(n, &pairs);
    LevelDefinition {
        number: n,
        theme: theme.into(),
        lesson: lesson.into(),
        pairs,
        quiz,
    }
}

// Question asks for the term behind one definition; options are four of the
// level's own terms with the correct one rotated into slot `n % 4`.
fn build_quiz(n: u8, pairs: &[Pair]) -> Quiz {
    let target = n as usize % pairs.len();
    let correct = &pairs[target];
    let mut options: Vec<String> = pairs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(_, p)| p.term.clone())
        .take(3)
        .collect();
    let answer = (n as usize % 4).min(options.len());
    options.insert(answer, correct.term.clone());
    Quiz {
        question: format!("Which term means \"{}\"?", correct.definition),
        options,
        answer,
    }
}
