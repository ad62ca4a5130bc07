//! Configuration for the acquisition pipeline and the default engine.
//!
//! Both structs expose public fields; start from `Default::default()` and
//! override what you need.

use std::time::Duration;

use crate::cancel::CancelToken;

/// Pipeline configuration.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_readability::{CancelToken, Options};
///
/// let token = CancelToken::new();
/// let options = Options {
///     timeout: Duration::from_secs(5),
///     cancel: Some(token.clone()),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Bounds connect and header wait for [`Pipeline::fetch`](crate::Pipeline::fetch).
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Aborts an in-flight fetch and any pending body read when fired.
    ///
    /// Default: `None`
    pub cancel: Option<CancelToken>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cancel: None,
        }
    }
}

/// Tuning knobs for the bundled Readability engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadabilityOptions {
    /// Maximum number of elements to parse. `0` means no limit.
    ///
    /// Default: `0`
    pub max_elements_to_parse: usize,

    /// Number of top candidates compared when choosing the article root.
    ///
    /// Default: `5`
    pub n_top_candidates: usize,

    /// Minimum characters an article must have to be returned as-is.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Keep `class` attributes in the output HTML.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Classes kept even when `keep_classes` is off.
    ///
    /// Default: `["page"]`
    pub classes_to_preserve: Vec<String>,

    /// Skip JSON-LD metadata.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            max_elements_to_parse: 0,
            n_top_candidates: 5,
            char_threshold: 500,
            keep_classes: false,
            classes_to_preserve: vec!["page".to_string()],
            disable_json_ld: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert!(opts.cancel.is_none());
    }

    #[test]
    fn default_readability_options() {
        let opts = ReadabilityOptions::default();
        assert_eq!(opts.max_elements_to_parse, 0);
        assert_eq!(opts.n_top_candidates, 5);
        assert_eq!(opts.char_threshold, 500);
        assert!(!opts.keep_classes);
        assert_eq!(opts.classes_to_preserve, vec!["page".to_string()]);
        assert!(!opts.disable_json_ld);
    }

    #[test]
    fn options_clone_shares_cancel_token() {
        let opts = Options {
            cancel: Some(CancelToken::new()),
            ..Options::default()
        };
        let copy = opts.clone();
        if let Some(token) = &opts.cancel {
            token.cancel();
        }
        assert!(copy.cancel.is_some_and(|t| t.is_cancelled()));
    }
}
