//! Chain Sentinel - layered risk scoring and alerting engine
//!
//! Demo binary: assembles the three profiles with static intel fixtures
//! and walks a handful of representative subjects through the pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use chrono::{TimeZone, Utc};
use eyre::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chain_sentinel::detectors::external_intel::{blocklist_hit, IntelFeed, StaticFeed};
use chain_sentinel::models::input::{
    ContractSnapshot, ParamValue, PlatformBatch, SocialCorpus, TxDescriptor,
};
use chain_sentinel::profiles;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!(
        r#"
    ╔══════════════════════════════════════════════╗
    ║                                              ║
    ║        C H A I N   S E N T I N E L           ║
    ║                                              ║
    ║    Layered Risk Scoring & Alerting Engine    ║
    ║                                              ║
    ╚══════════════════════════════════════════════╝
    "#
    );

    let observed_at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let scam_address = Address::repeat_byte(0xbe);

    let scam_feed: Arc<dyn IntelFeed> = Arc::new(
        StaticFeed::new("scamdb").with_hit(&format!("{}", scam_address), blocklist_hit("scamdb")),
    );

    // Transaction profile: unlimited approval toward a blocklisted spender.
    let tx_engine = profiles::transaction::build(
        profiles::transaction::default_config(),
        vec![Arc::clone(&scam_feed)],
    )?;
    let mut decoded_params = BTreeMap::new();
    decoded_params.insert("amount".to_string(), ParamValue::Uint(U256::MAX));
    let approval_tx = TxDescriptor {
        hash: B256::repeat_byte(0x01),
        from: Address::repeat_byte(0x11),
        to: Some(scam_address),
        selector: Some([0x09, 0x5e, 0xa7, 0xb3]),
        decoded_params,
        value: U256::ZERO,
        gas_price_gwei: 40,
        gas_limit: 60_000,
        input_len: 68,
        observed_at,
    };
    let verdict = tx_engine.assess(&approval_tx).await?;
    println!("{}", verdict.summary());

    // Contract profile: fresh mintable token with concentrated liquidity.
    let contract_engine =
        profiles::contract::build(profiles::contract::default_config(), vec![scam_feed])?;
    let suspicious_token = ContractSnapshot {
        address: Address::repeat_byte(0xcc),
        holder_count: 32,
        top10_holder_percent: 88.0,
        liquidity_usd: 700.0,
        liquidity_locked: false,
        lp_top_holder_percent: 92.0,
        has_blacklist: true,
        has_mint: true,
        has_pause: false,
        hidden_owner: false,
        ownership_renounced: false,
        verified_source: false,
        age_hours: 6,
        observed_at,
    };
    let verdict = contract_engine.assess(&suspicious_token).await?;
    println!("{}", verdict.summary());

    // Social profile: negative chatter surging across platforms.
    let social_engine = profiles::social::build(profiles::social::default_config())?;
    let corpus = SocialCorpus {
        query: "MOONCOIN".to_string(),
        platforms: vec![
            PlatformBatch {
                platform: "twitter".to_string(),
                mentions: 420,
                avg_sentiment: -0.7,
            },
            PlatformBatch {
                platform: "reddit".to_string(),
                mentions: 180,
                avg_sentiment: -0.5,
            },
            PlatformBatch {
                platform: "telegram".to_string(),
                mentions: 95,
                avg_sentiment: 0.1,
            },
        ],
        observed_at,
    };
    let verdict = social_engine.assess(&corpus).await?;
    println!("{}", verdict.summary());

    Ok(())
}
