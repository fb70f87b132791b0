use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StageError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(StageError::state("x").to_string().contains("state error:"));
    assert!(StageError::render("x").to_string().contains("render error:"));
    assert!(
        StageError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn kind_predicates() {
    assert!(StageError::config("x").is_config());
    assert!(!StageError::config("x").is_state());
    assert!(StageError::state("x").is_state());
}
