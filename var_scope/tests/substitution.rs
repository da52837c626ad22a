//! End-to-end template resolution through the public API.

use rstest::rstest;
use serde_json::{Value, json};
use var_scope::{DynamicVariables, Provider, Substitutor, VariableScope, resolve};

fn providers(values: &[Value]) -> Vec<&dyn Provider> {
    values.iter().map(|value| value as &dyn Provider).collect()
}

#[rstest]
#[case(vec![json!({"name": "World"})], "Hello {{name}}", "Hello World")]
#[case(
    vec![json!({"alpha": "{{beta-{{gamma}}}}"}), json!({"gamma": "delta"}), json!({"beta-delta": "epsilon"})],
    "{{alpha}}",
    "epsilon"
)]
#[case(
    vec![json!({"alpha": "{{beta}}"}), json!({"beta": "{{gamma}}"}), json!({"gamma": "{{delta}}"}), json!({"delta": "{{beta}}"})],
    "{{alpha}}",
    "{{beta}}"
)]
fn resolves_documented_scenarios(
    #[case] values: Vec<Value>,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let out = resolve(&json!(input), &providers(&values));
    assert_eq!(out, json!(expected));
}

#[rstest]
fn request_shaped_data_is_resolved_in_place() {
    let scope = VariableScope::from_values([
        ("base", json!("https://api.example.com")),
        ("version", json!(2)),
        ("auth", json!("Bearer {{token}}")),
        ("token", json!("abc")),
    ]);
    let request = json!({
        "url": "{{base}}/v{{version}}/items",
        "header": [{"key": "Authorization", "value": "{{auth}}"}],
        "body": {"mode": "raw", "raw": "{\"id\": \"{{missing}}\"}"}
    });
    let out = scope.replace_in(&request);
    assert_eq!(
        out,
        json!({
            "url": "https://api.example.com/v2/items",
            "header": [{"key": "Authorization", "value": "Bearer abc"}],
            "body": {"mode": "raw", "raw": "{\"id\": \"{{missing}}\"}"}
        })
    );
}

#[rstest]
fn scope_values_shadow_dynamic_defaults() {
    let scope = VariableScope::from_values([("$guid", json!("fixed"))]);
    assert_eq!(scope.replace_in(&json!("{{$guid}}")), json!("fixed"));
}

#[rstest]
fn dynamic_defaults_fill_unknown_names() {
    let out = VariableScope::new().replace_in(&json!("{{$timestamp}}"));
    let text = out.as_str().unwrap_or_default();
    assert!(text.parse::<i64>().is_ok(), "expected seconds, got {text}");
}

#[rstest]
fn custom_generators_compose_with_maps() {
    let overrides = json!({"who": "{{$who}}"});
    let dynamic = DynamicVariables::new().with("$who", || json!("generated"));
    let out = Substitutor::new()
        .with(&overrides)
        .with(&dynamic)
        .resolve_str("hi {{who}}");
    assert_eq!(out, "hi generated");
}
