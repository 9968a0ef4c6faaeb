//! Single-token detail: every field of one token, labelled and formatted.

use nftview_core::column::CellFormat;
use nftview_core::format::format_value;

use crate::catalog::{Catalog, CatalogError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetail {
    pub identifier: String,
    /// Concrete collection the token belongs to.
    pub collection: String,
    pub collection_name: String,
    pub fields: Vec<DetailField>,
}

impl Catalog {
    /// Looks up `identifier` inside `collection` (concrete or aggregate).
    ///
    /// Table columns come first, with their labels and formatters. Any other
    /// non-empty field follows under its raw key.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCollection`] or [`CatalogError::UnknownToken`].
    pub fn token(&self, collection: &str, identifier: &str) -> Result<TokenDetail, CatalogError> {
        let kind = self
            .kind_of(collection)
            .ok_or_else(|| CatalogError::UnknownCollection(collection.to_string()))?;
        let (data, row) = self
            .members(collection)?
            .into_iter()
            .find_map(|data| data.token(identifier).map(|row| (data, row)))
            .ok_or_else(|| CatalogError::UnknownToken {
                collection: collection.to_string(),
                identifier: identifier.to_string(),
            })?;

        let columns = self.columns(kind);
        let mut fields: Vec<DetailField> = columns
            .iter()
            .map(|column| DetailField {
                id: column.id.clone(),
                label: column.display_name.clone(),
                value: format_value(row.value(&column.id), column.format, &column.id),
            })
            .collect();
        fields.extend(
            row.iter()
                .filter(|(id, value)| !value.is_empty() && !columns.iter().any(|c| &c.id == *id))
                .map(|(id, value)| DetailField {
                    id: id.clone(),
                    label: id.clone(),
                    value: if value.is_composite() {
                        value.to_string()
                    } else {
                        format_value(value, CellFormat::for_column(id), id)
                    },
                }),
        );

        Ok(TokenDetail {
            identifier: identifier.to_string(),
            collection: data.info.collection.clone(),
            collection_name: data.info.name.clone(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::test_fixtures::write_sample;

    fn catalog() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path());
        let catalog = Catalog::load(&CatalogConfig::with_data_dir(dir.path())).unwrap();
        (dir, catalog)
    }

    fn field<'a>(detail: &'a TokenDetail, id: &str) -> &'a DetailField {
        detail.fields.iter().find(|f| f.id == id).unwrap()
    }

    #[test]
    fn columns_are_labelled_and_formatted() {
        let (_dir, catalog) = catalog();
        let detail = catalog.token("HEROES-aaaaaa", "HEROES-aaaaaa-01").unwrap();
        assert_eq!(detail.collection, "HEROES-aaaaaa");
        assert_eq!(detail.collection_name, "HEROES-aaaaaa name");
        assert_eq!(detail.fields[0].label, "Image");

        let owner = field(&detail, "owner");
        assert_eq!(owner.label, "Owner");
        assert_eq!(owner.value, "erd1qq...abcdef");
        assert_eq!(field(&detail, "priceAmount").value, "1.5");
    }

    #[test]
    fn extra_fields_follow_columns() {
        let (_dir, catalog) = catalog();
        let detail = catalog.token("HEROES-aaaaaa", "HEROES-aaaaaa-01").unwrap();
        let extra = field(&detail, "identifier");
        assert_eq!(extra.label, "identifier");
        assert_eq!(extra.value, "HEROES-aaaaaa-01");
        assert_eq!(detail.fields.last().unwrap().id, "identifier");
    }

    #[test]
    fn missing_cells_use_placeholder() {
        let (_dir, catalog) = catalog();
        let detail = catalog.token("HEROES-aaaaaa", "HEROES-aaaaaa-02").unwrap();
        assert_eq!(field(&detail, "thumbnailUrl").value, "-");
        assert_eq!(field(&detail, "level").value, "7");
    }

    #[test]
    fn aggregate_lookup_finds_member_token() {
        let (_dir, catalog) = catalog();
        let detail = catalog.token("ALL-CHARACTERS", "VILLAINS-bbbbbb-01").unwrap();
        assert_eq!(detail.collection, "VILLAINS-bbbbbb");
    }

    #[test]
    fn unknown_token_or_collection() {
        let (_dir, catalog) = catalog();
        assert!(matches!(
            catalog.token("HEROES-aaaaaa", "HEROES-aaaaaa-99"),
            Err(CatalogError::UnknownToken { .. })
        ));
        assert!(matches!(
            catalog.token("ALL-WEAPONS", "HEROES-aaaaaa-01"),
            Err(CatalogError::UnknownToken { .. })
        ));
        assert!(matches!(
            catalog.token("NOPE", "x"),
            Err(CatalogError::UnknownCollection(_))
        ));
    }
}
