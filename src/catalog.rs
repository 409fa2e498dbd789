use crate::error::CatalogError;
use crate::models::Firearm;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// On-disk catalog layout (JSON or TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub firearms: Vec<Firearm>,
}

/// Static firearm catalog, loaded once and never mutated
#[derive(Debug, Clone)]
pub struct Catalog {
    firearms: Vec<Firearm>,
}

impl Catalog {
    /// Build a catalog from firearms, validating it first
    ///
    /// Firearm and attachment names are trimmed so lookups by name match them.
    pub fn new(mut firearms: Vec<Firearm>) -> Result<Self, CatalogError> {
        for firearm in &mut firearms {
            trim_names(firearm);
        }
        validate_catalog(&firearms)?;
        Ok(Self { firearms })
    }

    /// The catalog bundled with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        parse_json(BUILTIN_CATALOG)
    }

    /// Load a catalog file, picking the parser from the extension
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let catalog = match extension.as_str() {
            "json" => parse_json(&content)?,
            "toml" => parse_toml(&content)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };

        info!(
            path = %path.display(),
            firearms = catalog.len(),
            "Loaded catalog file"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.firearms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firearms.is_empty()
    }

    /// Case-insensitive exact name lookup
    pub fn find(&self, name: &str) -> Option<&Firearm> {
        let needle = name.trim().to_lowercase();
        self.firearms
            .iter()
            .find(|f| f.name.to_lowercase() == needle)
    }

    /// Case-insensitive substring search on name or caliber
    ///
    /// A blank query matches everything. Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&Firearm> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.firearms.iter().collect();
        }

        let matches: Vec<&Firearm> = self
            .firearms
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&needle)
                    || f.caliber.to_lowercase().contains(&needle)
            })
            .collect();

        debug!(query = %query, matches = matches.len(), "Catalog search");
        matches
    }
}

fn parse_json(content: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile =
        serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Catalog::new(file.firearms)
}

fn parse_toml(content: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Catalog::new(file.firearms)
}

fn trim_names(firearm: &mut Firearm) {
    firearm.name = firearm.name.trim().to_string();
    for attachment in &mut firearm.attachments {
        attachment.name = attachment.name.trim().to_string();
    }
}

fn validate_catalog(firearms: &[Firearm]) -> Result<(), CatalogError> {
    if firearms.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut names = HashSet::new();
    for firearm in firearms {
        if firearm.name.trim().is_empty() {
            return Err(CatalogError::EmptyFirearmName);
        }
        if !names.insert(firearm.name.to_lowercase()) {
            return Err(CatalogError::DuplicateFirearm(firearm.name.clone()));
        }

        let mut attachment_names = HashSet::new();
        for attachment in &firearm.attachments {
            if !attachment_names.insert(attachment.name.as_str()) {
                return Err(CatalogError::DuplicateAttachment {
                    firearm: firearm.name.clone(),
                    attachment: attachment.name.clone(),
                });
            }
            validate_price_url(&firearm.name, &attachment.name, &attachment.price_url)?;
        }
    }

    Ok(())
}

fn validate_price_url(firearm: &str, attachment: &str, price_url: &str) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidPriceUrl {
        firearm: firearm.to_string(),
        attachment: attachment.to_string(),
        reason,
    };

    if price_url.trim().is_empty() {
        return Err(invalid("empty".to_string()));
    }

    let url = url::Url::parse(price_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, Price};
    use std::io::Write;

    fn firearm(name: &str, attachments: Vec<Attachment>) -> Firearm {
        Firearm {
            name: name.to_string(),
            image: String::new(),
            caliber: "9mm".to_string(),
            base_price: Price::from_cents(10000),
            attachments,
        }
    }

    fn attachment(name: &str, url: &str) -> Attachment {
        Attachment {
            name: name.to_string(),
            category: "Optic".to_string(),
            price_url: url.to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 2);

        let glock = catalog.find("glock 19 gen5").unwrap();
        assert_eq!(glock.base_price, Price::from_cents(53999));
        assert_eq!(glock.attachments.len(), 2);
        assert_eq!(glock.attachments[1].name, "Streamlight TLR-1");

        let shield = catalog.find("M&P Shield Plus").unwrap();
        assert_eq!(shield.base_price.to_string(), "$449.00");
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search("   ").len(), 2);

        let glock = catalog.search("GLOCK");
        assert_eq!(glock.len(), 1);
        assert_eq!(glock[0].name, "Glock 19 Gen5");

        // Caliber matches too
        assert_eq!(catalog.search("9mm").len(), 2);
        assert!(catalog.search("AR-15").is_empty());
    }

    #[test]
    fn test_rejects_duplicate_attachment() {
        let result = Catalog::new(vec![firearm(
            "Test",
            vec![
                attachment("Red Dot", "https://example.com/a"),
                attachment("Red Dot", "https://example.com/b"),
            ],
        )]);
        assert!(matches!(result, Err(CatalogError::DuplicateAttachment { .. })));
    }

    #[test]
    fn test_same_attachment_name_on_different_firearms() {
        let result = Catalog::new(vec![
            firearm("A", vec![attachment("Red Dot", "https://example.com/a")]),
            firearm("B", vec![attachment("Red Dot", "https://example.com/b")]),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_duplicate_firearm() {
        let result = Catalog::new(vec![firearm("Glock", vec![]), firearm("GLOCK", vec![])]);
        assert!(matches!(result, Err(CatalogError::DuplicateFirearm(_))));
    }

    #[test]
    fn test_padded_names_are_trimmed() {
        let catalog = Catalog::new(vec![firearm(
            " Glock ",
            vec![attachment("  Red Dot ", "https://example.com/a")],
        )])
        .unwrap();

        let glock = catalog.find("Glock").unwrap();
        assert_eq!(glock.name, "Glock");
        assert!(catalog.find(" Glock ").is_some());
        assert!(glock.has_attachment("Red Dot"));

        // Padding does not hide a duplicate
        let result = Catalog::new(vec![firearm("Glock", vec![]), firearm(" glock", vec![])]);
        assert!(matches!(result, Err(CatalogError::DuplicateFirearm(_))));
    }

    #[test]
    fn test_rejects_missing_locator() {
        let result = Catalog::new(vec![firearm("A", vec![attachment("Laser", "")])]);
        assert!(matches!(result, Err(CatalogError::InvalidPriceUrl { .. })));

        let result = Catalog::new(vec![firearm("A", vec![attachment("Laser", "ftp://x/y")])]);
        assert!(matches!(result, Err(CatalogError::InvalidPriceUrl { .. })));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[[firearms]]
name = "Sig P365"
caliber = "9mm"
base_price = 599.0

[[firearms.attachments]]
name = "Romeo Zero"
type = "Optic"
price_url = "https://api.mockmods.com/romeo"
"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        let sig = catalog.find("sig p365").unwrap();
        assert_eq!(sig.attachments[0].category, "Optic");
    }

    #[test]
    fn test_from_path_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = Catalog::from_path(file.path());
        assert!(matches!(result, Err(CatalogError::UnsupportedFormat(_))));
    }
}
