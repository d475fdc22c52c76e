use std::path::Path;

use tracing::info;

use crate::{Error, structures::Ingestor};

#[derive(Debug)]
pub enum SourceLocation {
    Local(String),
    Remote(String),
}

/// Local path of the file behind `input`, downloading remote sources into
/// `cache_dir` on first use.
pub async fn resolve_path(
    client: &reqwest::Client,
    input: &Ingestor,
    cache_dir: &str,
) -> Result<String, Error> {
    match input.location()? {
        SourceLocation::Local(path) => Ok(path),
        SourceLocation::Remote(url) => {
            let target = Path::new(cache_dir).join(cache_file_name(&url));
            if target.exists() {
                info!("Using cached {}", target.display());
            } else {
                info!("Downloading {} to {}", url, target.display());
                std::fs::create_dir_all(cache_dir)?;
                let bytes = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .bytes()
                    .await?;
                std::fs::write(&target, &bytes)?;
            }
            Ok(target.to_string_lossy().into_owned())
        }
    }
}

fn cache_file_name(url: &str) -> String {
    let name = url
        .split(['?', '#'])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .unwrap_or_default();

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();

    if sanitized.is_empty() {
        "download.osm.pbf".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_names_come_from_the_url() {
        assert_eq!(
            cache_file_name("https://download.geofabrik.de/europe/monaco-latest.osm.pbf"),
            "monaco-latest.osm.pbf"
        );
        assert_eq!(
            cache_file_name("https://example.org/extract.pbf?key=a b"),
            "extract.pbf"
        );
        assert_eq!(cache_file_name("https://example.org/"), "download.osm.pbf");
    }
}
