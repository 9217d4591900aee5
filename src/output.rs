//! Tabular output for harvested films.

use std::fs;
use std::path::Path;

use crate::harvest::HarvestError;
use crate::models::CatalogItem;

/// Header of the output file.
pub const OUTPUT_HEADER: [&str; 3] = ["Title", "Year", "LetterboxdID"];

/// Write accepted films to a CSV file in admission order.
///
/// Creates the parent directory when missing and overwrites any previous
/// output for the same list.
pub fn write_films(path: &Path, films: &[CatalogItem]) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(OUTPUT_HEADER)?;
    for film in films {
        writer.write_record([&film.title, &film.year, &film.external_id])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogItem;

    fn film(title: &str, year: &str, id: &str, order: usize) -> CatalogItem {
        CatalogItem {
            raw_display_name: format!("{} ({})", title, year),
            title: title.to_string(),
            year: year.to_string(),
            external_id: id.to_string(),
            detail_url: format!("/film/{}/", id),
            popularity_count: 0,
            admission_order: order,
        }
    }

    #[test]
    fn test_writes_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        let films = vec![film("First", "1999", "10", 1), film("Second", "2004", "20", 2)];

        write_films(&path, &films).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Title,Year,LetterboxdID");
        assert_eq!(lines[1], "First,1999,10");
        assert_eq!(lines[2], "Second,2004,20");
    }

    #[test]
    fn test_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        let films = vec![film("New York, New York", "1977", "7", 1)];

        write_films(&path, &films).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"New York, New York\",1977,7"));
    }

    #[test]
    fn test_creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/outputs/list.csv");
        write_films(&path, &[]).unwrap();
        assert!(path.exists());
    }
}
