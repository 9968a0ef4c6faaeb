//! On-disk sample data shared by unit tests.

use std::fs;
use std::path::Path;

pub(crate) const SITE_JSON: &str = r#"{
  "variables": {
    "collections": {
      "characters": ["HEROES-aaaaaa", "VILLAINS-bbbbbb"],
      "weapons": ["BLADES-cccccc"],
      "allCharacters": "ALL-CHARACTERS",
      "allWeapons": "ALL-WEAPONS"
    },
    "tableInfo": { "nftsPerPage": { "default": 25, "options": [10, 25, 50, 100] } },
    "tabelEntries": {
      "characters": {
        "searchable": ["name", "owner"],
        "sortable": ["name", "level", "priceAmount"],
        "filterable": ["class"],
        "rangeble": ["level", "priceAmount"]
      },
      "weapons": {
        "searchable": ["name"],
        "sortable": ["name", "damage"],
        "filterable": ["rarity"],
        "rangeble": ["damage"]
      }
    }
  },
  "contents": {
    "en": {
      "components": {
        "collectionTable": {
          "characters": {
            "columns": {
              "thumbnailUrl": "Image",
              "name": "Name",
              "class": "Class",
              "level": "Level",
              "owner": "Owner",
              "priceAmount": "Price"
            }
          },
          "weapons": {
            "columns": { "name": "Name", "rarity": "Rarity", "damage": "Damage" }
          }
        }
      }
    }
  }
}"#;

pub(crate) fn write_site(dir: &Path) {
    fs::write(dir.join("info.json"), SITE_JSON).unwrap();
}

/// Writes `<collection>/info.json` and `<collection>/nfts.json`.
pub(crate) fn write_collection(dir: &Path, collection: &str, nfts_json: &str) {
    let root = dir.join(collection);
    fs::create_dir_all(&root).unwrap();
    let info = format!(
        r#"{{"collection": "{collection}", "name": "{collection} name", "ticker": "{collection}",
            "holderCount": 3, "nftCount": 2, "assets": {{"website": "", "description": ""}}}}"#
    );
    fs::write(root.join("info.json"), info).unwrap();
    fs::write(root.join("nfts.json"), nfts_json).unwrap();
}

/// Writes `<collection>/info.json` and `<collection>/nfts.csv`.
pub(crate) fn write_csv_collection(dir: &Path, collection: &str, nfts_csv: &str) {
    write_collection(dir, collection, "{}");
    let root = dir.join(collection);
    fs::remove_file(root.join("nfts.json")).unwrap();
    fs::write(root.join("nfts.csv"), nfts_csv).unwrap();
}

/// Sample site with two character collections and one weapon collection.
pub(crate) fn write_sample(dir: &Path) {
    write_site(dir);
    write_collection(
        dir,
        "HEROES-aaaaaa",
        r#"{
          "HEROES-aaaaaa-01": {"identifier": "HEROES-aaaaaa-01", "name": "Amy", "class": "Mage",
             "level": 12, "owner": "erd1qqqqqqqqqqqqqpgqabcdefabcdef", "priceAmount": 1.5,
             "thumbnailUrl": "https://img/amy.png"},
          "HEROES-aaaaaa-02": {"identifier": "HEROES-aaaaaa-02", "name": "Bob", "class": "Tank",
             "level": "7", "owner": "erd1short", "priceAmount": 0.333}
        }"#,
    );
    write_collection(
        dir,
        "VILLAINS-bbbbbb",
        r#"{
          "VILLAINS-bbbbbb-01": {"identifier": "VILLAINS-bbbbbb-01", "name": "Cid", "class": "Mage",
             "level": 30, "owner": "erd1villainownerxxxxxxxxxx", "priceAmount": 10}
        }"#,
    );
    write_collection(
        dir,
        "BLADES-cccccc",
        r#"{
          "BLADES-cccccc-01": {"identifier": "BLADES-cccccc-01", "name": "Axe", "rarity": "Common", "damage": 12},
          "BLADES-cccccc-02": {"identifier": "BLADES-cccccc-02", "name": "Bow", "rarity": "Rare", "damage": 8.5}
        }"#,
    );
}
