//! Bypass path scenarios.
//!
//! The `*_raw` writes skip hooks and rules but still respect the schema.

use ward_tests::prelude::*;

mod raw_writes {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("raw_writes")
            .schema(schemas::orders)
            .schema(schemas::users)
            // No reference, bad state: accepted without validation
            .insert_raw("import_order", "Order", attrs! { "state" => "archived" }, |e| {
                e.accepted().stored("state", "archived").not_stored("reference")
            })
            .update_raw(
                "backfill",
                "import_order",
                attrs! { "canOnlyBeSetOnce" => "x" },
                |e| e.accepted().stored("canOnlyBeSetOnce", "x"),
            )
            // The pre-write hook does not run either
            .insert_raw("import_user", "User", attrs! { "email" => "legacy" }, |e| {
                e.accepted().not_stored("createdAt")
            })
            // Schema checks still apply
            .insert_raw("unknown_property", "Order", attrs! { "colour" => "red" }, |e| {
                e.error("Unknown property: colour on type Order")
            })
            .insert_raw("wrong_type", "Order", attrs! { "total" => "lots" }, |e| {
                e.error("Invalid property type: expected Float, got String for total")
            })
            // Failed raw writes store nothing
            .validate("count", OperationKind::Update, "Order", attrs!(), |e| {
                e.accepted().record_count(2)
            })
    }

    #[test]
    fn test_raw_writes_skip_validation() {
        scenario().run().unwrap();
    }
}

mod validated_after_raw {
    use super::*;

    #[test]
    fn test_validated_update_still_checks_rules() {
        Scenario::new("validated_after_raw")
            .schema(schemas::orders)
            .insert_raw("import_order", "Order", attrs! { "state" => "archived" }, |e| {
                e.accepted()
            })
            // Only the assigned subset is validated, so the stored bad state is not re-checked
            .update("touch_total", "import_order", attrs! { "total" => 10.5 }, |e| {
                e.accepted().stored("state", "archived").stored("total", 10.5)
            })
            .update("bad_state", "import_order", attrs! { "state" => "lost" }, |e| e.rejected())
            .run()
            .unwrap();
    }
}
