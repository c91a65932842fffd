//! Property tests for invoice math, quota rules and numbering

use billflow::core::mapper::decode_items;
use billflow::core::money;
use billflow::core::quota::{LOW_QUOTA_THRESHOLD, can_create_more};
use billflow::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (0.0f64..1_000.0, 0.0f64..10_000.0, "[a-z]{1,12}")
        .prop_map(|(quantity, price, description)| LineItem::new(description, quantity, price))
}

proptest! {
    #[test]
    fn prop_subtotal_ignores_item_order(
        (items, shuffled) in prop::collection::vec(line_item(), 0..20)
            .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle())),
    ) {
        prop_assert!(close(money::subtotal(&items), money::subtotal(&shuffled)));
    }

    #[test]
    fn prop_total_is_subtotal_plus_tax(
        items in prop::collection::vec(line_item(), 0..20),
        rate in 0.0f64..100.0,
    ) {
        let totals = InvoiceTotals::compute(&items, rate, None);

        prop_assert!(close(totals.total_amount, totals.subtotal * (1.0 + rate / 100.0)));
        prop_assert_eq!(totals.discount_amount, None);
    }

    #[test]
    fn prop_discount_is_subtracted(
        items in prop::collection::vec(line_item(), 1..10),
        tax_rate in 0.0f64..50.0,
        discount_rate in 0.0f64..50.0,
    ) {
        let totals = InvoiceTotals::compute(&items, tax_rate, Some(discount_rate));
        let discount = totals.discount_amount.unwrap_or_default();

        prop_assert!(close(discount, totals.subtotal * discount_rate / 100.0));
        prop_assert!(close(
            totals.total_amount,
            totals.subtotal + totals.tax_amount - discount
        ));
    }

    #[test]
    fn prop_first_invoice_always_allowed(limit in -5i64..100) {
        prop_assert!(can_create_more(0, limit));
    }

    #[test]
    fn prop_creation_allowed_below_limit(count in 1i64..200, limit in 0i64..200) {
        prop_assert_eq!(can_create_more(count, limit), count < limit);
    }

    #[test]
    fn prop_status_precedence(count in 0i64..100, remaining in -10i64..100) {
        let status = QuotaStatus::classify(count, remaining);
        let expected = if remaining <= 0 && count > 0 {
            QuotaStatus::Blocked
        } else if count == 0 {
            QuotaStatus::Welcome
        } else if remaining <= LOW_QUOTA_THRESHOLD {
            QuotaStatus::Warning
        } else {
            QuotaStatus::Normal
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn prop_snapshot_remaining_keeps_sign(count in 0i64..200, plan_index in 0usize..3) {
        let plan = Plan::ALL[plan_index];
        let snapshot = QuotaSnapshot::new(plan, &PlanRegistry::default(), count);

        prop_assert_eq!(snapshot.remaining, snapshot.limit - count);
        if count > snapshot.limit {
            prop_assert_eq!(snapshot.status, QuotaStatus::Blocked);
        }
        prop_assert_eq!(snapshot.can_create_more(), can_create_more(count, snapshot.limit));
    }

    #[test]
    fn prop_invoice_numbers_are_well_formed(seed in any::<u64>()) {
        let pattern = regex::Regex::new(r"^INV-\d{4}$").unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        prop_assert!(pattern.is_match(&numbering::generate_with(&mut rng)));
    }

    #[test]
    fn prop_items_column_keeps_ids_and_order(items in prop::collection::vec(line_item(), 0..10)) {
        let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();

        let native = decode_items(serde_json::to_value(&items).unwrap()).unwrap();
        let stringified = decode_items(serde_json::Value::String(
            serde_json::to_string(&items).unwrap(),
        ))
        .unwrap();

        prop_assert_eq!(native.iter().map(|i| i.id.clone()).collect::<Vec<_>>(), ids.clone());
        prop_assert_eq!(stringified.iter().map(|i| i.id.clone()).collect::<Vec<_>>(), ids);
    }
}
