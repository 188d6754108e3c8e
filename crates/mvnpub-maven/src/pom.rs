//! POM header parsing: the project identity and packaging a publication needs.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

/// Project identity read from a POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomHeader {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `jar` when the POM declares none.
    pub packaging: String,
}

/// Reads a [`PomHeader`] from a POM file.
pub trait PomParser {
    fn parse(&self, path: &Path) -> MvnpubResult<PomHeader>;
}

/// [`PomParser`] over `quick-xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlPomParser;

impl PomParser for XmlPomParser {
    fn parse(&self, path: &Path) -> MvnpubResult<PomHeader> {
        let xml = std::fs::read_to_string(path).map_err(|e| {
            MvnpubError::config(format!("Failed to read POM {}: {e}", path.display()))
        })?;
        parse_pom_header(&xml).map_err(|e| match e {
            MvnpubError::Configuration { message } => {
                MvnpubError::config(format!("{message} ({})", path.display()))
            }
            other => other,
        })
    }
}

#[derive(Debug, Default)]
struct RawHeader {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    parent_group_id: Option<String>,
    parent_version: Option<String>,
    properties: BTreeMap<String, String>,
}

impl RawHeader {
    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self
                .group_id
                .clone()
                .or_else(|| self.parent_group_id.clone()),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => {
                self.version.clone().or_else(|| self.parent_version.clone())
            }
            "project.parent.groupId" => self.parent_group_id.clone(),
            "project.parent.version" => self.parent_version.clone(),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Resolve `${property}` references, leaving unknown ones in place.
    fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        for _ in 0..20 {
            let Some(start) = result.find("${") else {
                break;
            };
            let Some(end) = result[start..].find('}') else {
                break;
            };
            let key = &result[start + 2..start + end];
            if key.contains("${") {
                break;
            }
            let Some(value) = self.resolve_property(key) else {
                break;
            };
            if value.contains(&format!("${{{key}}}")) {
                break;
            }
            result.replace_range(start..start + end + 1, &value);
        }
        result
    }

    fn finish(self) -> Result<PomHeader, String> {
        let group_id = self
            .group_id
            .clone()
            .or_else(|| self.parent_group_id.clone())
            .ok_or("missing <groupId>")?;
        let artifact_id = self.artifact_id.clone().ok_or("missing <artifactId>")?;
        let version = self
            .version
            .clone()
            .or_else(|| self.parent_version.clone())
            .ok_or("missing <version>")?;
        let packaging = self.packaging.clone().unwrap_or_else(|| "jar".to_string());

        let header = PomHeader {
            group_id: self.interpolate(&group_id),
            artifact_id: self.interpolate(&artifact_id),
            version: self.interpolate(&version),
            packaging: self.interpolate(&packaging),
        };
        for value in [
            &header.group_id,
            &header.artifact_id,
            &header.version,
            &header.packaging,
        ] {
            if value.contains("${") {
                return Err(format!("unresolved property in '{value}'"));
            }
        }
        Ok(header)
    }
}

/// Parse the header of a POM XML document.
///
/// `groupId` and `version` fall back to the `<parent>` declaration, and
/// `${...}` references to project fields or `<properties>` are resolved.
pub fn parse_pom_header(xml: &str) -> MvnpubResult<PomHeader> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut raw = RawHeader::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");
                let value = text_buf.trim().to_string();

                match ctx.as_str() {
                    "project>groupId" => raw.group_id = Some(value),
                    "project>artifactId" => raw.artifact_id = Some(value),
                    "project>version" => raw.version = Some(value),
                    "project>packaging" => raw.packaging = Some(value),
                    "project>parent>groupId" => raw.parent_group_id = Some(value),
                    "project>parent>version" => raw.parent_version = Some(value),
                    _ => {
                        if path.len() == 3 && path[1] == "properties" {
                            raw.properties.insert(path[2].clone(), value);
                        }
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MvnpubError::config(format!("Failed to parse POM XML: {e}")));
            }
            _ => {}
        }
    }

    raw.finish()
        .map_err(|reason| MvnpubError::config(format!("Invalid POM: {reason}")))
}
