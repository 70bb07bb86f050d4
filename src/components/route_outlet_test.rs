use super::*;
use serde_json::json;

fn params(value: serde_json::Value) -> Params {
    [("id".to_owned(), value)].into_iter().collect()
}

#[test]
fn param_id_reads_path_segment_strings() {
    assert_eq!(param_id(&params(json!("42"))), Some(42));
}

#[test]
fn param_id_reads_numbers_from_named_intents() {
    assert_eq!(param_id(&params(json!(7))), Some(7));
}

#[test]
fn param_id_rejects_non_numeric_and_missing_values() {
    assert_eq!(param_id(&params(json!("abc"))), None);
    assert_eq!(param_id(&params(json!(true))), None);
    assert_eq!(param_id(&params(json!(9_000_000_000_i64))), None);
    assert_eq!(param_id(&Params::new()), None);
}
