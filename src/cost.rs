//! Cost estimation from vendor pricing tables.
//!
//! Prices are USD per one million tokens, fixed at build time. Lookup is by
//! exact model name; an unknown model yields `None` rather than an error, so
//! callers can log and move on. Gemini carries no table and always yields
//! `None`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::providers::Provider;
use crate::response::Usage;

/// Input/output price for one model, USD per 1M tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Cost in USD for the given usage.
    pub fn cost(&self, usage: Usage) -> f64 {
        let input = usage.input_tokens as f64 * self.input_per_million / 1_000_000.0;
        let output = usage.output_tokens as f64 * self.output_per_million / 1_000_000.0;
        input + output
    }
}

static OPENAI_PRICING: Lazy<HashMap<&'static str, ModelPricing>> = Lazy::new(|| {
    HashMap::from([
        ("gpt-4o", ModelPricing::new(5.0, 15.0)),
        ("gpt-4o-2024-05-13", ModelPricing::new(5.0, 15.0)),
        ("gpt-4-turbo", ModelPricing::new(10.0, 30.0)),
        ("gpt-4-turbo-2024-04-09", ModelPricing::new(10.0, 30.0)),
        ("gpt-4-1106-preview", ModelPricing::new(10.0, 30.0)),
        ("gpt-4", ModelPricing::new(30.0, 60.0)),
        ("gpt-3.5-turbo-0125", ModelPricing::new(0.5, 1.5)),
        ("gpt-3.5-turbo-1106", ModelPricing::new(1.0, 2.0)),
        ("gpt-3.5-turbo-16k", ModelPricing::new(3.0, 4.0)),
    ])
});

static ANTHROPIC_PRICING: Lazy<HashMap<&'static str, ModelPricing>> = Lazy::new(|| {
    HashMap::from([
        ("claude-instant-1.2", ModelPricing::new(0.8, 2.4)),
        ("claude-2.0", ModelPricing::new(8.0, 24.0)),
        ("claude-2.1", ModelPricing::new(8.0, 24.0)),
        ("claude-3-haiku-20240307", ModelPricing::new(0.25, 1.25)),
        ("claude-3-sonnet-20240229", ModelPricing::new(3.0, 15.0)),
        ("claude-3-opus-20240229", ModelPricing::new(15.0, 75.0)),
    ])
});

static COHERE_PRICING: Lazy<HashMap<&'static str, ModelPricing>> = Lazy::new(|| {
    HashMap::from([
        ("command-r", ModelPricing::new(0.5, 1.5)),
        ("command-r-plus", ModelPricing::new(3.0, 15.0)),
    ])
});

static GROQ_PRICING: Lazy<HashMap<&'static str, ModelPricing>> = Lazy::new(|| {
    HashMap::from([
        ("llama3-8b-8192", ModelPricing::new(0.05, 0.1)),
        ("llama3-70b-8192", ModelPricing::new(0.59, 0.79)),
        ("mixtral-8x7b-32768", ModelPricing::new(0.27, 0.27)),
        ("gemma-7b-it", ModelPricing::new(0.1, 0.1)),
    ])
});

/// Pricing for a provider's model, when a table entry exists.
pub fn pricing(provider: Provider, model: &str) -> Option<ModelPricing> {
    let table = match provider {
        Provider::OpenAI => &OPENAI_PRICING,
        Provider::Anthropic => &ANTHROPIC_PRICING,
        Provider::Cohere => &COHERE_PRICING,
        Provider::Groq => &GROQ_PRICING,
        Provider::Gemini => return None,
    };
    table.get(model).copied()
}

/// Estimate the USD cost of a call, `None` when the model is not priced.
pub fn estimate(provider: Provider, model: &str, usage: Usage) -> Option<f64> {
    match pricing(provider, model) {
        Some(entry) => Some(entry.cost(usage)),
        None => {
            tracing::debug!(%provider, model, "no pricing entry for model");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_gpt_4o_cost() {
        // 1M in at $5 + 1M out at $15.
        let cost = estimate(Provider::OpenAI, "gpt-4o", Usage::new(1_000_000, 1_000_000));
        assert_eq!(cost, Some(20.0));
    }

    #[test]
    fn test_anthropic_opus_cost() {
        let cost = estimate(
            Provider::Anthropic,
            "claude-3-opus-20240229",
            Usage::new(1_000, 2_000),
        );
        let expected = 1_000.0 * 15.0 / 1_000_000.0 + 2_000.0 * 75.0 / 1_000_000.0;
        assert_eq!(cost, Some(expected));
    }

    #[test]
    fn test_unknown_model_is_none() {
        assert_eq!(
            estimate(Provider::OpenAI, "gpt-99-ultra", Usage::new(10, 10)),
            None
        );
    }

    #[test]
    fn test_gemini_is_never_priced() {
        assert_eq!(
            estimate(Provider::Gemini, "gemini-1.5-pro", Usage::new(10, 10)),
            None
        );
    }

    #[test]
    fn test_zero_usage_costs_nothing() {
        assert_eq!(
            estimate(Provider::Groq, "llama3-8b-8192", Usage::default()),
            Some(0.0)
        );
    }
}
