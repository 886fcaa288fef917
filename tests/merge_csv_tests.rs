//! CSV round trip through the record merger
mod common;

use common::dataset;
use storefront_harvest::domain::{merge_datasets, SchemaError};
use storefront_harvest::infrastructure::{read_dataset, write_dataset};
use tempfile::TempDir;

#[test]
fn merged_csv_enriches_base_rows() {
    let dir = TempDir::new().unwrap();
    let base_path = dir.path().join("base.csv");
    let incoming_path = dir.path().join("details.csv");
    let output_path = dir.path().join("merged.csv");

    std::fs::write(
        &base_path,
        "Index,Product Name,URL\n1,Tee (listing),https://shop.com/products/tee\n2,Cap,https://shop.com/products/cap\n",
    )
    .unwrap();
    write_dataset(
        &incoming_path,
        &dataset(
            &["Product Name", "Price", "URL", "Fabrication"],
            &[
                &["Tee", "$25.00", "https://shop.com/products/tee", "Cotton"],
                &["Error", "Error", "https://shop.com/products/cap", "Error"],
                &["Hat", "$9.00", "https://shop.com/products/hat", "Wool"],
            ],
        ),
    )
    .unwrap();

    let base = read_dataset(&base_path).unwrap();
    let incoming = read_dataset(&incoming_path).unwrap();
    let merged = merge_datasets(&base, &incoming, "URL").unwrap();
    write_dataset(&output_path, &merged).unwrap();

    let reloaded = read_dataset(&output_path).unwrap();
    assert_eq!(reloaded.columns(), ["Index", "Product Name", "URL", "Price", "Fabrication"]);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.rows()[0], ["1", "Tee", "https://shop.com/products/tee", "$25.00", "Cotton"]);
    assert_eq!(reloaded.rows()[1], ["2", "Cap", "https://shop.com/products/cap", "Error", "Error"]);
}

#[test]
fn missing_key_column_is_a_schema_error() {
    let base = dataset(&["URL", "Product Name"], &[&["https://shop.com/products/tee", "Tee"]]);
    let incoming = dataset(&["Link", "Price"], &[&["https://shop.com/products/tee", "$25.00"]]);

    let err = merge_datasets(&base, &incoming, "URL").unwrap_err();

    assert_eq!(
        err,
        SchemaError {
            dataset: "Incoming".to_string(),
            column: "URL".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Incoming dataset must have a 'URL' column");
}
