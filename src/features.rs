//! Token attribute encoding for the tagging backend.

use crfsuite::{Attribute, Item};

/// Turns the words of one sentence into backend attribute items.
///
/// The backend scores whatever attributes it is handed; which attributes a
/// token emits is the only model-shaping decision made on this side of the
/// library boundary. Trainer variants differ solely in the feature set
/// they install, and the same set must be used at train and tag time.
pub trait FeatureSet {
    fn encode(&self, words: &[String]) -> Vec<Item>;
}

/// Stock context-window features: the surface form, its lowercased form,
/// prefixes and suffixes up to three characters, shape flags, and the
/// immediate neighbors. Boundary positions emit begin/end markers instead
/// of out-of-range neighbors.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFeatureSet;

impl FeatureSet for DefaultFeatureSet {
    fn encode(&self, words: &[String]) -> Vec<Item> {
        (0..words.len()).map(|t| token_features(words, t)).collect()
    }
}

fn token_features(words: &[String], t: usize) -> Item {
    let word = words[t].as_str();
    let mut item: Item = vec![
        Attribute::new(format!("w[0]={word}"), 1.0),
        Attribute::new(format!("lw[0]={}", word.to_lowercase()), 1.0),
    ];
    let chars: Vec<char> = word.chars().collect();
    for n in 1..=3.min(chars.len()) {
        let prefix: String = chars[..n].iter().collect();
        let suffix: String = chars[chars.len() - n..].iter().collect();
        item.push(Attribute::new(format!("pre[{n}]={prefix}"), 1.0));
        item.push(Attribute::new(format!("suf[{n}]={suffix}"), 1.0));
    }
    if chars.iter().any(|c| c.is_ascii_digit()) {
        item.push(Attribute::new("has-digit", 1.0));
    }
    if chars.contains(&'-') {
        item.push(Attribute::new("has-hyphen", 1.0));
    }
    if chars.first().is_some_and(|c| c.is_uppercase()) {
        item.push(Attribute::new("init-cap", 1.0));
    }
    if t == 0 {
        item.push(Attribute::new("bos", 1.0));
    } else {
        item.push(Attribute::new(format!("w[-1]={}", words[t - 1]), 1.0));
        if t >= 2 {
            item.push(Attribute::new(format!("w[-2]={}", words[t - 2]), 1.0));
        }
    }
    if t + 1 == words.len() {
        item.push(Attribute::new("eos", 1.0));
    } else {
        item.push(Attribute::new(format!("w[+1]={}", words[t + 1]), 1.0));
        if t + 2 < words.len() {
            item.push(Attribute::new(format!("w[+2]={}", words[t + 2]), 1.0));
        }
    }
    item
}
