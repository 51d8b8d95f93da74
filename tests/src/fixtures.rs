//! # Chain Fixtures
//!
//! `ChainBuilder` lays inscriptions out block by block so every envelope
//! gets a distinct `(block_height, tx_index)`.

use shared_types::{Address, ChainLocation, Inscription, InscriptionEnvelope};

pub const WRAPPED: &str = "WDOGE(WRAPPED-DOGE)";

#[derive(Debug, Clone)]
pub struct ChainBuilder {
    height: u64,
    tx_index: u32,
    envelopes: Vec<InscriptionEnvelope>,
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            height: 1,
            tx_index: 0,
            envelopes: Vec::new(),
        }
    }

    /// Later envelopes go into the next block.
    pub fn next_block(&mut self) -> &mut Self {
        self.height += 1;
        self.tx_index = 0;
        self
    }

    pub fn push(&mut self, sender: &str, json: &str) -> &mut Self {
        self.push_with(sender, json, "", 1)
    }

    pub fn push_with(&mut self, sender: &str, json: &str, receivers: &str, repeat: u64) -> &mut Self {
        let inscription = match Inscription::from_json(json) {
            Ok(inscription) => inscription,
            Err(err) => panic!("fixture {json} does not decode: {err}"),
        };
        let envelope = InscriptionEnvelope::new(
            ChainLocation::new(self.height, self.tx_index),
            Address::new(sender),
            inscription,
        )
        .with_receivers(receivers)
        .with_repeat(repeat);
        self.envelopes.push(envelope);
        self.tx_index += 1;
        self
    }

    pub fn deploy(&mut self, sender: &str, tick: &str, max: u64, lim: u64) -> &mut Self {
        self.push(
            sender,
            &format!(r#"{{"p":"drc-20","op":"deploy","tick":"{tick}","max":"{max}","lim":"{lim}"}}"#),
        )
    }

    pub fn mint(&mut self, sender: &str, tick: &str, amount: u64) -> &mut Self {
        self.push(
            sender,
            &format!(r#"{{"p":"drc-20","op":"mint","tick":"{tick}","amt":"{amount}"}}"#),
        )
    }

    pub fn transfer(&mut self, sender: &str, tick: &str, amount: u64, to: &str) -> &mut Self {
        self.push_with(
            sender,
            &format!(r#"{{"p":"drc-20","op":"transfer","tick":"{tick}","amt":"{amount}"}}"#),
            to,
            1,
        )
    }

    pub fn create(&mut self, sender: &str, a: &str, b: &str, amt_a: u64, amt_b: u64) -> &mut Self {
        self.push(
            sender,
            &format!(
                r#"{{"p":"pair-v1","op":"create","tick0":"{a}","tick1":"{b}","amt0":"{amt_a}","amt1":"{amt_b}"}}"#
            ),
        )
    }

    pub fn add(&mut self, sender: &str, a: &str, b: &str, amt_a: u64, amt_b: u64) -> &mut Self {
        self.push(
            sender,
            &format!(
                r#"{{"p":"pair-v1","op":"add","tick0":"{a}","tick1":"{b}","amt0":"{amt_a}","amt1":"{amt_b}"}}"#
            ),
        )
    }

    pub fn remove(&mut self, sender: &str, a: &str, b: &str, liquidity: u64) -> &mut Self {
        self.push(
            sender,
            &format!(
                r#"{{"p":"pair-v1","op":"remove","tick0":"{a}","tick1":"{b}","liquidity":"{liquidity}"}}"#
            ),
        )
    }

    pub fn swap(&mut self, sender: &str, tick_in: &str, tick_out: &str, amount_in: u64, min_out: u64) -> &mut Self {
        self.push(
            sender,
            &format!(
                r#"{{"p":"pair-v1","op":"swap","tick0":"{tick_in}","tick1":"{tick_out}","amt0":"{amount_in}","amt1":"0","amt1_min":"{min_out}"}}"#
            ),
        )
    }

    pub fn deposit(&mut self, sender: &str, amount: u64) -> &mut Self {
        self.push(
            sender,
            &format!(r#"{{"p":"wdoge","op":"deposit","tick":"{WRAPPED}","amt":"{amount}"}}"#),
        )
    }

    pub fn withdraw(&mut self, sender: &str, amount: u64) -> &mut Self {
        self.push(
            sender,
            &format!(r#"{{"p":"wdoge","op":"withdraw","tick":"{WRAPPED}","amt":"{amount}"}}"#),
        )
    }

    pub fn envelopes(&self) -> Vec<InscriptionEnvelope> {
        self.envelopes.clone()
    }

    /// One envelope per line, as the runtime reads them.
    pub fn to_jsonl(&self) -> String {
        self.envelopes
            .iter()
            .map(|envelope| match serde_json::to_string(envelope) {
                Ok(line) => line,
                Err(err) => panic!("fixture does not encode: {err}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
