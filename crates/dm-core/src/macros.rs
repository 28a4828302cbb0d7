//! `{{NAME}}` macro substitution for migration scripts.
//!
//! Tokens are two opening braces, one or more of `A-Z`, `0-9` or `_`, and two
//! closing braces. Each token is replaced by the value of the environment
//! variable it names. Unset or empty variables resolve to the empty string
//! and produce a warning; they never fail the substitution.
//!
//! Substitution is a single left-to-right pass: substituted values are not
//! scanned for further tokens.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

static MACRO_RE: OnceLock<Regex> = OnceLock::new();

fn macro_regex() -> &'static Regex {
    MACRO_RE.get_or_init(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("valid regex literal"))
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Result of expanding a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Script text with every token substituted
    pub text: String,
    /// Variables that were unset or empty, in order of first appearance
    pub unresolved: Vec<String>,
}

/// Substitutes `{{NAME}}` tokens with values from an environment lookup.
pub struct MacroProcessor {
    lookup: Lookup,
}

impl MacroProcessor {
    /// Resolve tokens from the process environment at call time.
    pub fn from_env() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Resolve tokens from a fixed set of variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self {
            lookup: Box::new(move |name| vars.get(name).cloned()),
        }
    }

    /// Substitute every token, reporting which names resolved empty.
    pub fn expand(&self, text: &str) -> Expansion {
        let mut unresolved: Vec<String> = Vec::new();
        let expanded = macro_regex().replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match (self.lookup)(name) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    if !unresolved.iter().any(|n| n == name) {
                        unresolved.push(name.to_string());
                    }
                    String::new()
                }
            }
        });
        Expansion {
            text: expanded.into_owned(),
            unresolved,
        }
    }

    /// Substitute every token, logging a warning per unresolved variable.
    pub fn resolve(&self, text: &str) -> String {
        let expansion = self.expand(text);
        for name in &expansion.unresolved {
            log::warn!("Environment variable {name} is not set; substituting empty string");
        }
        expansion.text
    }
}

impl Default for MacroProcessor {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for MacroProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroProcessor").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "macros_test.rs"]
mod tests;
