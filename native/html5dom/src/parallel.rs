//! Parallel Batch Conversion
//!
//! Uses Rayon to convert independent documents concurrently. Each input
//! gets its own parser run and its own document; nothing is shared between
//! conversions except the read-only configuration.

use crate::builder::NativeBuilder;
use crate::config::{Config, ParseOptions};
use crate::convert::parse_with;
use crate::dom::Document;
use crate::error::Result;
use crate::parse::Html5everParser;
use rayon::prelude::*;

/// Convert every input into a native-tree document, preserving input order
pub fn parse_batch<I>(inputs: &[I], options: &ParseOptions, config: &Config) -> Vec<Result<Document>>
where
    I: AsRef<[u8]> + Sync,
{
    let parser = Html5everParser::new();
    log::debug!(target: "html5dom::parallel", "converting batch of {}", inputs.len());
    inputs
        .par_iter()
        .map(|input| parse_with::<_, NativeBuilder>(&parser, input.as_ref(), options, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let inputs = [
            "<!DOCTYPE html><title>one</title>",
            "<p>two",
            "<!DOCTYPE html><svg></svg>",
        ];
        let results = parse_batch(&inputs, &ParseOptions::default(), Config::global());
        assert_eq!(results.len(), 3);

        let docs: Vec<Document> = results.into_iter().map(|r| r.unwrap()).collect();
        assert!(docs[0].tree().internal_subset().is_some());
        assert!(docs[1].tree().internal_subset().is_none());
        assert!(docs[0].errors().is_empty());
        assert!(!docs[1].errors().is_empty());
        let svg = docs[2]
            .tree()
            .descendants(docs[2].tree().root_element_id().unwrap())
            .any(|id| docs[2].tree().node_name(id) == Some("svg"));
        assert!(svg);
    }

    #[test]
    fn test_empty_batch() {
        let inputs: [&[u8]; 0] = [];
        assert!(parse_batch(&inputs, &ParseOptions::default(), Config::global()).is_empty());
    }
}
