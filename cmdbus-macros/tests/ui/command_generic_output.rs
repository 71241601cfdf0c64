use cmdbus_core::command::Command;
use cmdbus_macros::command;
use std::collections::HashMap;

#[command(output = Vec<String>)]
struct ListOwners;

#[command(output = HashMap<String, u32>, name = "inventory.count")]
struct CountInventory {
    warehouse: String,
}

fn main() {
    let owners: <ListOwners as Command>::Output = vec!["alice".to_string()];
    assert_eq!(owners.len(), 1);

    let counts: <CountInventory as Command>::Output = HashMap::new();
    assert!(counts.is_empty());
    assert_eq!(<CountInventory as Command>::NAME, "inventory.count");

    let cmd = CountInventory { warehouse: "w1".into() };
    let _ = cmd.warehouse;
}
