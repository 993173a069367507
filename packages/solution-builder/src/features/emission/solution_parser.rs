//! Solution file reader
//!
//! Walks `Project(...)` blocks and their `ProjectDependencies` sections;
//! everything else in the file is skipped. Used for `inspect` and to check
//! emitted solutions.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::solution::SOLUTION_HEADER;
use crate::errors::{Result, SolutionError};

static PROJECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^Project\("(\{[^}]*\})"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)"\s*,\s*"([^"]*)"\s*$"#)
        .expect("Invalid regex")
});

static DEPENDENCY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\{[^}]*\})\s*=\s*(\{[^}]*\})\s*$").expect("Invalid regex"));

/// One `Project(...)` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionProject {
    pub type_guid: String,
    pub name: String,
    pub path: PathBuf,
    pub project_id: String,

    /// IDs listed in `ProjectDependencies`, file order
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSolution {
    pub projects: Vec<SolutionProject>,

    /// `Configuration|Platform` pairs from `SolutionConfigurationPlatforms`
    pub configurations: Vec<String>,
}

impl ParsedSolution {
    pub fn find_by_id(&self, id: &str) -> Option<&SolutionProject> {
        self.projects
            .iter()
            .find(|p| p.project_id.eq_ignore_ascii_case(id))
    }

    /// Dependency paths of `project`; unknown IDs are skipped
    pub fn dependency_paths(&self, project: &SolutionProject) -> Vec<PathBuf> {
        project
            .dependencies
            .iter()
            .filter_map(|id| self.find_by_id(id).map(|p| p.path.clone()))
            .collect()
    }

    /// Every `(project, dependency)` path pair
    pub fn edges(&self) -> Vec<(PathBuf, PathBuf)> {
        self.projects
            .iter()
            .flat_map(|p| {
                self.dependency_paths(p)
                    .into_iter()
                    .map(move |dep| (p.path.clone(), dep))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.projects.iter().map(|p| p.dependencies.len()).sum()
    }
}

#[derive(PartialEq)]
enum Section {
    Top,
    Project,
    Dependencies,
    Global,
    SolutionConfigurations,
    OtherGlobal,
}

pub fn read_solution(path: &Path) -> Result<ParsedSolution> {
    let text = std::fs::read_to_string(path)?;
    parse_solution(&text)
}

pub fn parse_solution(text: &str) -> Result<ParsedSolution> {
    let mut parsed = ParsedSolution::default();
    let mut section = Section::Top;
    let mut saw_header = false;

    for (offset, raw) in text.lines().enumerate() {
        let line_no = offset + 1;
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !saw_header {
            if !trimmed.starts_with(SOLUTION_HEADER.split(',').next().unwrap_or_default()) {
                return Err(parse_error(line_no, "missing solution file header"));
            }
            saw_header = true;
            continue;
        }

        match section {
            Section::Top => {
                if let Some(caps) = PROJECT_LINE.captures(trimmed) {
                    parsed.projects.push(SolutionProject {
                        type_guid: caps[1].to_string(),
                        name: caps[2].to_string(),
                        path: PathBuf::from(&caps[3]),
                        project_id: caps[4].to_string(),
                        dependencies: Vec::new(),
                    });
                    section = Section::Project;
                } else if trimmed == "Global" {
                    section = Section::Global;
                } else if trimmed.starts_with("Project(") {
                    return Err(parse_error(line_no, "malformed Project line"));
                }
            }
            Section::Project => {
                if trimmed == "EndProject" {
                    section = Section::Top;
                } else if trimmed.starts_with("ProjectSection(ProjectDependencies)") {
                    section = Section::Dependencies;
                }
            }
            Section::Dependencies => {
                if trimmed == "EndProjectSection" {
                    section = Section::Project;
                } else if let Some(caps) = DEPENDENCY_LINE.captures(trimmed) {
                    if let Some(project) = parsed.projects.last_mut() {
                        project.dependencies.push(caps[1].to_string());
                    }
                } else {
                    return Err(parse_error(line_no, "malformed dependency line"));
                }
            }
            Section::Global => {
                if trimmed == "EndGlobal" {
                    section = Section::Top;
                } else if trimmed.starts_with("GlobalSection(SolutionConfigurationPlatforms)") {
                    section = Section::SolutionConfigurations;
                } else if trimmed.starts_with("GlobalSection(") {
                    section = Section::OtherGlobal;
                }
            }
            Section::SolutionConfigurations => {
                if trimmed == "EndGlobalSection" {
                    section = Section::Global;
                } else if let Some((pair, _)) = trimmed.split_once('=') {
                    parsed.configurations.push(pair.trim().to_string());
                }
            }
            Section::OtherGlobal => {
                if trimmed == "EndGlobalSection" {
                    section = Section::Global;
                }
            }
        }
    }

    if !saw_header {
        return Err(parse_error(1, "empty solution file"));
    }
    if section != Section::Top {
        return Err(parse_error(text.lines().count(), "unterminated block at end of file"));
    }
    Ok(parsed)
}

fn parse_error(line: usize, message: &str) -> SolutionError {
    SolutionError::SolutionParse {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Microsoft Visual Studio Solution File, Format Version 12.00
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"/t/app.csproj\", \"{A}\"
\tProjectSection(ProjectDependencies) = postProject
\t\t{C} = {C}
\tEndProjectSection
EndProject
Project(\"{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}\") = \"Core\", \"/t/core.vcxproj\", \"{C}\"
\tProjectSection(ProjectDependencies) = postProject
\tEndProjectSection
EndProject
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tRelease|x64 = Release|x64
\tEndGlobalSection
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution
\t\t{A}.Release|x64.ActiveCfg = Release|x64
\tEndGlobalSection
EndGlobal
";

    #[test]
    fn test_parse_projects_and_dependencies() {
        let parsed = parse_solution(SAMPLE).unwrap();
        assert_eq!(parsed.projects.len(), 2);
        assert_eq!(parsed.projects[0].name, "App");
        assert_eq!(parsed.projects[0].dependencies, vec!["{C}".to_string()]);
        assert_eq!(parsed.configurations, vec!["Release|x64".to_string()]);
        assert_eq!(
            parsed.edges(),
            vec![(PathBuf::from("/t/app.csproj"), PathBuf::from("/t/core.vcxproj"))]
        );
        assert_eq!(parsed.edge_count(), 1);
    }

    #[test]
    fn test_crlf_tolerated() {
        let crlf = SAMPLE.replace('\n', "\r\n");
        assert_eq!(parse_solution(&crlf).unwrap(), parse_solution(SAMPLE).unwrap());
    }

    #[test]
    fn test_missing_header_rejected() {
        let result = parse_solution("Global\nEndGlobal\n");
        assert!(matches!(result, Err(SolutionError::SolutionParse { line: 1, .. })));
    }

    #[test]
    fn test_unterminated_project_rejected() {
        let text = "Microsoft Visual Studio Solution File, Format Version 12.00\n\
Project(\"{X}\") = \"A\", \"/a.csproj\", \"{A}\"\n";
        assert!(matches!(
            parse_solution(text),
            Err(SolutionError::SolutionParse { .. })
        ));
    }
}
