use std::collections::HashSet;

use serde_json::json;

use crate::util::{draft, no_names, validator};
use surveyr_common::network::{HostPattern, PatternKind};
use surveyr_core::validation::HOSTS;

const VALID: &[&str] = &[
    "10.10.181.9",
    "10.10.181.9/16",
    "10.10.128.[1:25]",
    "10.10.[1:20].25",
    "10.10.[1:20].[1:25]",
    "localhost",
    "mycentos.com",
    "my-rhel[a:d].company.com",
    "my-rhel[120:400].company.com",
];

const INVALID: &[&str] = &[
    "192.1..2",
    "192.01.5.10",
    "192.1.5.1/",
    "192.01.5.[1:10]/10",
    "192.3.4.455",
    "192.3.4.455/16",
    "10.10.[181.9",
    "10.10.128.[a:25]",
    "10.10.[1-20].25",
    "1.1.1.1/33",
    "my_rhel[a:d].company.com",
    "my-rhel[a:400].company.com",
    "10.1.1.1-10.1.1.254",
];

#[test]
fn every_valid_token_expands_to_its_cardinality() {
    for token in VALID {
        let pattern = HostPattern::parse(token).unwrap();
        let hosts: Vec<String> = pattern.expand().collect();
        let unique: HashSet<&String> = hosts.iter().collect();

        assert!(!hosts.is_empty(), "{token}");
        assert_eq!(hosts.len() as u64, pattern.cardinality(), "{token}");
        assert_eq!(unique.len(), hosts.len(), "{token} repeats a host");
    }
}

#[test]
fn every_invalid_token_is_rejected() {
    for token in INVALID {
        assert!(HostPattern::parse(token).is_err(), "{token} was accepted");
    }
}

#[test]
fn invalid_host_list_yields_one_error_per_entry() {
    let value = json!({
        "name": "bad-hosts",
        "hosts": INVALID,
        "port": 22,
        "credentials": [2],
    });
    let errors = validator().validate(&draft(value), &no_names()).unwrap_err();
    let messages = errors.get(HOSTS);

    assert_eq!(messages.len(), INVALID.len());
    for (message, token) in messages.iter().zip(INVALID) {
        assert!(message.starts_with(&format!("{token}: ")), "{message}");
    }
}

#[test]
fn valid_and_invalid_entries_mixed() {
    let hosts: Vec<&str> = VALID.iter().chain(&INVALID[..3]).copied().collect();
    let value = json!({"name": "mixed", "hosts": hosts, "port": 22, "credentials": [2]});
    let errors = validator().validate(&draft(value), &no_names()).unwrap_err();
    assert_eq!(errors.get(HOSTS).len(), 3);
}

#[test]
fn two_ranged_octets_form_a_cartesian_product() {
    let pattern = HostPattern::parse("10.10.[1:20].[1:25]").unwrap();
    assert_eq!(pattern.kind(), PatternKind::Ipv4Ranged);
    assert_eq!(pattern.cardinality(), 500);

    let hosts: HashSet<String> = pattern.expand().collect();
    assert_eq!(hosts.len(), 500);
    for third in 1..=20 {
        for fourth in 1..=25 {
            assert!(hosts.contains(&format!("10.10.{third}.{fourth}")));
        }
    }
}

#[test]
fn hostname_ranges_expand_in_order() {
    let alpha: Vec<String> = HostPattern::parse("my-rhel[a:d].company.com").unwrap().expand().collect();
    assert_eq!(
        alpha,
        [
            "my-rhela.company.com",
            "my-rhelb.company.com",
            "my-rhelc.company.com",
            "my-rheld.company.com"
        ]
    );

    let numeric = HostPattern::parse("my-rhel[120:400].company.com").unwrap();
    assert_eq!(numeric.cardinality(), 281);
    assert_eq!(numeric.expand().next().as_deref(), Some("my-rhel120.company.com"));
    assert_eq!(numeric.expand().last().as_deref(), Some("my-rhel400.company.com"));
}

#[test]
fn validated_sources_keep_host_order() {
    let value = json!({"name": "ordered", "hosts": VALID, "port": 22, "credentials": [2]});
    let source = validator().validate(&draft(value), &no_names()).unwrap();
    let tokens: Vec<&str> = source.hosts.iter().map(HostPattern::as_str).collect();
    assert_eq!(tokens, VALID);
}
