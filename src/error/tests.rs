use super::*;

#[test]
fn test_validation_functions() {
    assert!(validate::length("buffer", 32, 32).is_ok());
    let err = validate::length("buffer", 16, 32).unwrap_err();

    match err {
        Error::Length {
            context,
            expected,
            actual,
        } => {
            assert_eq!(context, "buffer");
            assert_eq!(expected, 32);
            assert_eq!(actual, 16);
        }
        _ => panic!("Expected Length error"),
    }

    assert!(validate::min_length("seed", 16, 16).is_ok());
    assert!(validate::min_length("seed", 8, 16).is_err());
    assert!(validate::max_length("seed", 64, 64).is_ok());
    assert!(validate::max_length("seed", 65, 64).is_err());
}

#[test]
fn test_display_formatting() {
    let err = Error::HardenedFromPublicOnly { index: 0x8000_0000 };
    assert!(err.to_string().contains("0x80000000"));

    let err = Error::InvalidScalar {
        context: "master key",
        reason: "seed produced zero scalar",
    };
    assert!(err.to_string().contains("master key"));
}
