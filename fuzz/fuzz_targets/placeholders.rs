//! Fuzz target for placeholder substitution.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use loctable_i18n::{ArgValue, ArgumentSignature, PlaceholderSubstitutor};

#[derive(Debug, Arbitrary)]
struct FuzzTemplate {
    template: String,
    args: Vec<Option<String>>,
}

fuzz_target!(|data: FuzzTemplate| {
    let args: Vec<ArgValue> = data.args.into_iter().map(ArgValue::from).collect();

    let tokens = PlaceholderSubstitutor::tokens(&data.template);
    for range in &tokens {
        // Token ranges must land on char boundaries
        assert!(data.template.get(range.clone()).is_some());
    }

    let output = PlaceholderSubstitutor::apply(&data.template, &args);
    if tokens.is_empty() {
        assert_eq!(output, data.template);
    }

    let _ = ArgumentSignature::of(&args);
});
