use std::fs;
use std::sync::Arc;

use inventory_content::ContentFactory;
use inventory_core::{BonusStats, ConnectionState, InventoryConfig, Rotation};
use tempfile::TempDir;

const ITEMS: &str = r####"(
    items: [
        (id: "010", name: "Bolt", weight: 0.25, shape: ["#"]),
        (id: "011", name: "Plank", weight: 1.0, category: Armor, shape: ["##"]),
    ],
)"####;

const BONUSES: &str = r#"(
    bonuses: [
        (id: "W1", name: "Workbench", stats: (defense: 2), requirements: ["011", "010"]),
    ],
)"#;

fn data_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, body) in files {
        fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}

#[test]
fn loads_a_data_directory() {
    let dir = data_dir(&[
        ("config.toml", "width = 5\nheight = 2\nmax_weight = 10.0\n"),
        ("items.ron", ITEMS),
        ("bonuses.ron", BONUSES),
    ]);

    let content = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(content.config, InventoryConfig::with_size(5, 2).max_weight(10.0));
    assert_eq!(content.item_catalog().len(), 2);

    let items = content.item_catalog();
    let mut inventory = content.inventory().unwrap();
    let plank = inventory.spawn(Arc::clone(items.get("011").unwrap()), Rotation::NONE);
    let bolt = inventory.spawn(Arc::clone(items.get("010").unwrap()), Rotation::NONE);
    assert!(inventory.place(plank, 0, 0));
    assert!(inventory.place(bolt, 2, 0));

    assert_eq!(inventory.bonus_label(), "Workbench");
    assert_eq!(inventory.stat_totals(), BonusStats::new(0, 2, 0));
    assert_eq!(inventory.item(bolt).unwrap().state(), ConnectionState::Closed);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = data_dir(&[("items.ron", ITEMS), ("bonuses.ron", BONUSES)]);
    let content = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(content.config, InventoryConfig::default());
}

#[test]
fn missing_catalog_names_the_file() {
    let dir = data_dir(&[("items.ron", ITEMS)]);
    let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to read file"));
    assert!(message.contains("bonuses.ron"));
}

#[test]
fn unknown_requirement_is_rejected() {
    let dir = data_dir(&[
        ("items.ron", ITEMS),
        (
            "bonuses.ron",
            r#"(bonuses: [(id: "W1", name: "Workbench", requirements: ["011", "999"])])"#,
        ),
    ]);
    let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
    assert_eq!(err.to_string(), "Bonus W1 requires unknown item 999");
}

#[test]
fn out_of_range_config_is_rejected_with_its_path() {
    let dir = data_dir(&[
        ("config.toml", "width = 8\nheight = 7\nmax_weight = 8.0\n"),
        ("items.ron", ITEMS),
        ("bonuses.ron", BONUSES),
    ]);
    let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Invalid inventory config"));
    assert!(message.contains("config.toml"));
}

#[test]
fn embedded_potions_upgrade_from_pair_to_belt() {
    let content = ContentFactory::embedded().unwrap();
    let items = content.item_catalog();
    let potion = items.get("002").unwrap();
    let mut inventory = content.inventory().unwrap();

    let first = inventory.spawn(Arc::clone(potion), Rotation::NONE);
    let second = inventory.spawn(Arc::clone(potion), Rotation::NONE);
    assert!(inventory.place(first, 0, 0));
    assert!(inventory.place(second, 1, 0));
    assert_eq!(inventory.bonus_label(), "Twin Potions");
    assert_eq!(inventory.item(first).unwrap().state(), ConnectionState::Opened);

    let third = inventory.spawn(Arc::clone(potion), Rotation::NONE);
    assert!(inventory.place(third, 2, 0));
    assert_eq!(inventory.bonus_label(), "Potion Belt");
    assert_eq!(inventory.stat_totals(), BonusStats::new(0, 0, 25));
    assert_eq!(inventory.item(third).unwrap().state(), ConnectionState::Closed);
}

#[test]
fn embedded_kit_closes_once_the_hook_joins() {
    let content = ContentFactory::embedded().unwrap();
    let items = content.item_catalog();
    let mut inventory = content.inventory().unwrap();

    let sword = inventory.spawn(Arc::clone(items.get("001").unwrap()), Rotation::NONE);
    let shield = inventory.spawn(Arc::clone(items.get("003").unwrap()), Rotation::NONE);
    let hook = inventory.spawn(Arc::clone(items.get("006").unwrap()), Rotation::NONE);
    assert!(inventory.place(sword, 0, 0));
    assert!(inventory.place(shield, 3, 0));
    assert_eq!(inventory.bonus_label(), "Sword and Board");
    assert_eq!(inventory.item(shield).unwrap().state(), ConnectionState::Opened);

    assert!(inventory.place(hook, 5, 0));
    assert_eq!(inventory.bonus_label(), "Adventurer Kit");
    assert_eq!(inventory.stat_totals(), BonusStats::new(4, 4, 5));
    assert_eq!(inventory.current_weight(), 4.5);
}
