//! `resolve` command handler

use anyhow::Result;
use cubecana::{CardCatalog, PrintingResolver};

use super::CatalogOptions;

/// Resolve one reference to `(printing id, human-readable form)`
pub fn describe(catalog: &CardCatalog, text: &str) -> Result<(String, String)> {
    let resolver = PrintingResolver::new(catalog);
    let id = resolver.resolve_human_readable(text)?;
    let readable = resolver
        .human_readable(&id)
        .unwrap_or_else(|| id.to_string());
    Ok((id.to_string(), readable))
}

/// Handle `resolve`
pub fn handle(options: &CatalogOptions, text: &str) -> Result<()> {
    let catalog = options.load()?;
    let (id, readable) = describe(&catalog, text)?;
    println!("{}", readable);
    println!("  Printing: {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_fixtures;

    #[test]
    fn test_describe_default_printing() {
        let catalog = test_fixtures::catalog();
        let (id, readable) = describe(&catalog, "ELSA snow-queen").unwrap();
        assert_eq!(id, "elsasnowqueen-1-42");
        assert_eq!(readable, "Elsa - Snow Queen (1) 42");
    }

    #[test]
    fn test_describe_qualified_and_machine_forms() {
        let catalog = test_fixtures::catalog();
        let (id, _) = describe(&catalog, "Elsa - Snow Queen (P1) 3").unwrap();
        assert_eq!(id, "elsasnowqueen-P1-3");

        let (_, readable) = describe(&catalog, "elsasnowqueen-P1-3").unwrap();
        assert_eq!(readable, "Elsa - Snow Queen (P1) 3");
    }

    #[test]
    fn test_describe_unknown_printing_lists_available() {
        let catalog = test_fixtures::catalog();
        let err = describe(&catalog, "Elsa - Snow Queen (2) 1").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Elsa - Snow Queen (1) 42"));
    }
}
