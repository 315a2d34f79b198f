#![cfg(feature = "serde")]

use goap_utility::{UtilityCurve, UtilitySelectorConfig};

#[test]
fn curves_use_a_type_tag() {
    let curve: UtilityCurve =
        serde_json::from_str(r#"{"type":"logistic","midpoint":0.5,"steepness":10.0}"#)
            .expect("deserialize");
    assert_eq!(
        curve,
        UtilityCurve::Logistic {
            midpoint: 0.5,
            steepness: 10.0
        }
    );

    let identity: UtilityCurve = serde_json::from_str(r#"{"type":"identity"}"#).expect("identity");
    assert_eq!(identity, UtilityCurve::Identity);
}

#[test]
fn selector_config_defaults() {
    let config: UtilitySelectorConfig = serde_json::from_str("{}").expect("deserialize");
    assert_eq!(config, UtilitySelectorConfig::default());
}
