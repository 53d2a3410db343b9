use proptest::prelude::*;
use tls_material::material::{generate_self_signed, parse_private_key, verify};

use crate::support::{server_name, OTHER_KEY, SHARED_KEY};

fn hostname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,14}(\\.[a-z][a-z0-9]{0,7}){0,2}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn generated_certificate_verifies_for_its_hostname(host in hostname()) {
        let name = server_name(&host);
        let cert = generate_self_signed(&SHARED_KEY, &name).unwrap();
        prop_assert!(verify(&SHARED_KEY, &cert, &name).unwrap());
    }

    #[test]
    fn generated_certificate_rejects_other_hostnames(first in hostname(), second in hostname()) {
        prop_assume!(first != second);
        let cert = generate_self_signed(&SHARED_KEY, &server_name(&first)).unwrap();
        prop_assert!(!verify(&SHARED_KEY, &cert, &server_name(&second)).unwrap());
    }

    #[test]
    fn generated_certificate_rejects_other_keys(host in hostname()) {
        let name = server_name(&host);
        let cert = generate_self_signed(&SHARED_KEY, &name).unwrap();
        prop_assert!(!verify(&OTHER_KEY, &cert, &name).unwrap());
    }
}

#[test]
fn generated_keys_parse_and_differ() {
    assert_ne!(*SHARED_KEY, *OTHER_KEY);
    assert!(parse_private_key(&SHARED_KEY).is_ok());
    assert!(parse_private_key(&OTHER_KEY).is_ok());
}

#[test]
fn common_name_match_is_exact() {
    let cert = generate_self_signed(&SHARED_KEY, &server_name("example.test")).unwrap();
    assert!(!verify(&SHARED_KEY, &cert, &server_name("example.test.")).unwrap());
    assert!(!verify(&SHARED_KEY, &cert, &server_name("www.example.test")).unwrap());
}
