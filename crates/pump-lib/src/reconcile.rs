//! Inference-time feature reconciliation
//!
//! Maps the three raw measurement categories onto whatever column
//! names the model fixed at training time. Matching is an explicit
//! ordered rule table so the priority order stays auditable: `soil`
//! keywords are tested before `temp`, `temp` before `hum`, and the
//! first hit wins even when a later keyword also appears in the name.

use crate::error::{PumpError, Result};
use crate::models::{RawInputs, RawKey, ReconciledRow};
use std::io::{self, BufRead, Write};

/// One substring rule: if any keyword occurs in the lower-cased
/// feature name, the value comes from `source`
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub source: RawKey,
    pub keywords: &'static [&'static str],
}

/// Rule table, evaluated top to bottom. Order is significant.
pub const KEYWORD_RULES: [KeywordRule; 3] = [
    KeywordRule {
        source: RawKey::Soil,
        keywords: &["soil", "moist"],
    },
    KeywordRule {
        source: RawKey::Temp,
        keywords: &["temp", "temperature"],
    },
    KeywordRule {
        source: RawKey::Hum,
        keywords: &["hum", "humid", "humidity"],
    },
];

/// Last-resort source for a value no rule could assign
pub trait ValuePrompter {
    fn prompt(&mut self, name: &str) -> Result<f64>;
}

/// Interactive prompter for operator-attended runs. Re-prompts until
/// a valid float is entered.
pub struct StdinPrompter;

impl ValuePrompter for StdinPrompter {
    fn prompt(&mut self, name: &str) -> Result<f64> {
        let stdin = io::stdin();
        loop {
            print!("Enter {name}: ");
            io::stdout().flush().map_err(PumpError::Prompt)?;

            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line).map_err(PumpError::Prompt)?;
            if read == 0 {
                // stdin closed mid-prompt
                return Err(PumpError::MissingFeatureValue(name.to_string()));
            }
            match line.trim().parse::<f64>() {
                Ok(value) => return Ok(value),
                Err(_) => println!("Please enter a numeric value."),
            }
        }
    }
}

/// Prompter for non-interactive deployments: an unresolved feature is
/// a hard error instead of a blocked console read
pub struct NonInteractive;

impl ValuePrompter for NonInteractive {
    fn prompt(&mut self, name: &str) -> Result<f64> {
        Err(PumpError::MissingFeatureValue(name.to_string()))
    }
}

/// Build a value for every feature name the model requires, in the
/// model's order.
///
/// Per name: keyword rules first, then an exact match against a
/// present raw input key, then the prompter. When the model saved no
/// feature list the row falls back to the fixed `[soil, temp, hum]`
/// order.
pub fn reconcile(
    feature_names: Option<&[String]>,
    raw: &RawInputs,
    prompter: &mut dyn ValuePrompter,
) -> Result<ReconciledRow> {
    let Some(names) = feature_names else {
        let mut pairs = Vec::with_capacity(3);
        for key in [RawKey::Soil, RawKey::Temp, RawKey::Hum] {
            let value = match raw.get(key) {
                Some(v) => v,
                None => prompter.prompt(key.name())?,
            };
            pairs.push((key.name().to_string(), value));
        }
        return Ok(ReconciledRow::new(pairs));
    };

    let mut pairs = Vec::with_capacity(names.len());
    for name in names {
        pairs.push((name.clone(), resolve_one(name, raw, prompter)?));
    }
    Ok(ReconciledRow::new(pairs))
}

fn resolve_one(name: &str, raw: &RawInputs, prompter: &mut dyn ValuePrompter) -> Result<f64> {
    let lowered = name.to_lowercase();

    for rule in &KEYWORD_RULES {
        if rule.keywords.iter().any(|k| lowered.contains(k)) {
            return match raw.get(rule.source) {
                Some(value) => Ok(value),
                // Matched a category we have no value for: ask for
                // the raw key, not the model's column name
                None => prompter.prompt(rule.source.name()),
            };
        }
    }

    for key in [RawKey::Soil, RawKey::Temp, RawKey::Hum] {
        if lowered == key.name() {
            if let Some(value) = raw.get(key) {
                return Ok(value);
            }
        }
    }

    prompter.prompt(name)
}
