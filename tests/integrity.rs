use order_normalizer::{
    error::ConstraintKind,
    services::integrity::{ALL_PROBES, Outcome, Probe, unused_order_id},
};

#[test]
fn spare_order_id_sits_above_the_loaded_range() {
    assert_eq!(unused_order_id(1000, 1019), Some(1020));
}

#[test]
fn spare_order_id_falls_below_when_the_top_is_taken() {
    assert_eq!(unused_order_id(1000, i32::MAX), Some(999));
}

#[test]
fn no_spare_order_id_when_every_id_is_used() {
    assert_eq!(unused_order_id(i32::MIN, i32::MAX), None);
}

#[test]
fn rejections_and_cascades_are_expected_where_the_schema_says() {
    assert_eq!(
        Probe::DuplicateEmail.expected(),
        Outcome::Rejected(ConstraintKind::Unique)
    );
    assert_eq!(
        Probe::ZeroQuantity.expected(),
        Outcome::Rejected(ConstraintKind::Check)
    );
    let cascades = ALL_PROBES
        .iter()
        .filter(|p| p.expected() == Outcome::Accepted)
        .count();
    assert_eq!(cascades, 2);
}
