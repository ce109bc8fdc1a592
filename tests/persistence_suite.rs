use std::fs;
use std::path::Path;

use rust_decimal_macros::dec;
use serde_json::Value;
use tenant_ledger::{
    ledger::{BillCategory, Charge, ChargeKind, ChargeStatus, Tenant, TenantId},
    storage::{ChargeRepository, ChargeStore, JsonStore, TenantStore},
};
use tempfile::tempdir;

mod common;
use common::period;

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path()).unwrap();
    let tenant = TenantId::from("reliable");
    store
        .save_charge(&Charge::rent(tenant.clone(), period(2024, "May"), dec!(5000)))
        .expect("initial save");
    let path = store.charges_path(&tenant).unwrap();
    let original = fs::read_to_string(&path).expect("read original file");

    // Create directory that collides with the temp file name to force File::create to fail.
    fs::create_dir_all(tmp_path_for(&path)).unwrap();

    let result = store.save_charge(&Charge::rent(tenant, period(2024, "June"), dec!(5000)));
    assert!(
        result.is_err(),
        "expected save_charge to fail when temp path is a directory"
    );
    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );
}

#[test]
fn charges_are_written_as_plain_json_numbers() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path()).unwrap();
    let tenant = TenantId::from("t-1");
    let charge = Charge::bill(
        tenant.clone(),
        period(2024, "March"),
        BillCategory::Electric,
        dec!(2450.5),
    )
    .with_settled(dec!(1000));
    store.save_charge(&charge).unwrap();

    let raw: Value =
        serde_json::from_str(&fs::read_to_string(store.charges_path(&tenant).unwrap()).unwrap())
            .unwrap();
    let stored = &raw[0];
    assert_eq!(stored["amount_due"], serde_json::json!(2450.5));
    assert_eq!(stored["amount_settled"], serde_json::json!(1000.0));
    assert_eq!(stored["kind"]["type"], "bill");
    assert_eq!(stored["kind"]["category"], "electric");
    assert_eq!(stored["period"]["month"], "March");
    assert_eq!(stored["status"], "pending");

    let reloaded = store.list_charges(&tenant).unwrap();
    assert_eq!(reloaded, vec![charge]);
}

#[test]
fn hand_edited_documents_are_read_leniently() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path()).unwrap();
    let tenant = TenantId::from("legacy");
    let document = r#"[
        {
            "id": "8d1c4f0a-11b2-4c55-8f6e-6f7f4b0c0a01",
            "tenant_id": "legacy",
            "kind": {"type": "rent"},
            "period": {"year": "2023", "month": "december"},
            "amount_due": "15000",
            "amount_settled": null,
            "status": "PAID",
            "settled_date": "2023-12-28"
        },
        {
            "id": "8d1c4f0a-11b2-4c55-8f6e-6f7f4b0c0a02",
            "tenant_id": "legacy",
            "kind": {"type": "bill", "category": "water"},
            "period": {"year": 2024, "month": "January"},
            "amount_due": "abc",
            "status": "late"
        }
    ]"#;
    fs::write(store.charges_path(&tenant).unwrap(), document).unwrap();

    let charges = store.list_charges(&tenant).unwrap();
    assert_eq!(charges.len(), 2);
    assert_eq!(charges[0].amount_due, dec!(15000));
    assert_eq!(charges[0].amount_settled, dec!(0));
    assert_eq!(charges[0].status, ChargeStatus::Paid);
    assert_eq!(charges[0].period, period(2023, "December"));
    assert!(charges[0].settled_date.is_some());
    assert_eq!(
        charges[1].kind,
        ChargeKind::Bill(BillCategory::Other("water".into()))
    );
    assert_eq!(charges[1].amount_due, dec!(0));
    assert_eq!(charges[1].status, ChargeStatus::Pending);
}

#[test]
fn list_tenants_skips_unreadable_documents() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path()).unwrap();
    store
        .save_tenant(&Tenant::new("b-2", "Bilal").with_property("Block B"))
        .unwrap();
    store.save_tenant(&Tenant::new("a-1", "Ayesha")).unwrap();
    fs::write(temp.path().join("tenants").join("junk.json"), "not json").unwrap();
    fs::write(temp.path().join("tenants").join("notes.txt"), "ignored").unwrap();

    let tenants = store.list_tenants().unwrap();
    let ids: Vec<&str> = tenants.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a-1", "b-2"]);
    assert_eq!(tenants[1].property.as_deref(), Some("Block B"));
}

#[test]
fn charges_filed_under_wrong_tenant_are_rejected() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path()).unwrap();
    let owner = TenantId::from("owner");
    let charge = Charge::rent(TenantId::from("intruder"), period(2024, "May"), dec!(10));
    let document = serde_json::to_string(&vec![charge]).unwrap();
    fs::write(store.charges_path(&owner).unwrap(), document).unwrap();
    assert!(store.list_charges(&owner).is_err());
}
