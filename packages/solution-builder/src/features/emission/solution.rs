//! Solution file rendering
//!
//! Line-oriented, `\n` terminated. Projects appear in closure order (full
//! path); dependency sub-blocks list direct edges in discovery order.

use std::fmt::Write;

use crate::features::closure::BuildClosure;
use crate::features::dependency_graph::ProjectGraph;

pub const SOLUTION_HEADER: &str = "Microsoft Visual Studio Solution File, Format Version 12.00";

/// Rendering switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionOptions {
    pub configuration: String,
    pub platform: String,

    /// `false` when dependencies travel as project references instead
    pub inline_dependencies: bool,
}

impl SolutionOptions {
    pub fn config_platform(&self) -> String {
        format!("{}|{}", self.configuration, self.platform)
    }
}

/// Solution text for the in-build nodes of `closure`
pub fn render_solution(graph: &ProjectGraph, closure: &BuildClosure, options: &SolutionOptions) -> String {
    let config_platform = options.config_platform();
    let mut out = String::new();

    // fmt::Write into a String cannot fail
    let _ = writeln!(out, "{}", SOLUTION_HEADER);
    for &idx in &closure.in_build {
        let node = graph.node(idx);
        let _ = writeln!(
            out,
            "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
            node.kind.type_guid(),
            node.name,
            node.full_path.display(),
            node.project_id
        );
        out.push_str("\tProjectSection(ProjectDependencies) = postProject\n");
        if options.inline_dependencies {
            for dep in graph.dependencies(idx) {
                let id = &graph.node(dep).project_id;
                let _ = writeln!(out, "\t\t{} = {}", id, id);
            }
        }
        out.push_str("\tEndProjectSection\n");
        out.push_str("EndProject\n");
    }

    out.push_str("Global\n");
    out.push_str("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\n");
    let _ = writeln!(out, "\t\t{} = {}", config_platform, config_platform);
    out.push_str("\tEndGlobalSection\n");
    out.push_str("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\n");
    for &idx in &closure.in_build {
        let id = &graph.node(idx).project_id;
        let _ = writeln!(out, "\t\t{}.{}.ActiveCfg = {}", id, config_platform, config_platform);
        let _ = writeln!(out, "\t\t{}.{}.Build.0 = {}", id, config_platform, config_platform);
    }
    out.push_str("\tEndGlobalSection\n");
    out.push_str("\tGlobalSection(ExtensibilityGlobals) = postSolution\n");
    out.push_str("\tEndGlobalSection\n");
    out.push_str("\tGlobalSection(ExtensibilityAddIns) = postSolution\n");
    out.push_str("\tEndGlobalSection\n");
    out.push_str("EndGlobal\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::closure::ClosureMode;
    use crate::features::dependency_graph::DependencyKind;
    use crate::shared::models::{ProjectKind, ProjectNode};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn node(path: &str, kind: ProjectKind, name: &str, id: &str) -> ProjectNode {
        let mut node = ProjectNode::new(PathBuf::from(path), kind);
        node.name = name.to_string();
        node.project_id = id.to_string();
        node
    }

    fn sample() -> (ProjectGraph, BuildClosure) {
        let mut graph = ProjectGraph::new(vec![
            node("/t/core.vcxproj", ProjectKind::Native, "Core", "{C}"),
            node("/t/app.csproj", ProjectKind::Managed, "App", "{A}"),
        ]);
        let app = graph.find_by_path("/t/app.csproj").unwrap();
        let core = graph.find_by_path("/t/core.vcxproj").unwrap();
        graph.add_dependency(app, core, DependencyKind::AssemblyReference);
        let closure = BuildClosure::compute(&graph, &ClosureMode::All);
        (graph, closure)
    }

    #[test]
    fn test_render_inline_dependencies() {
        let (graph, closure) = sample();
        let options = SolutionOptions {
            configuration: "Release".into(),
            platform: "x64".into(),
            inline_dependencies: true,
        };

        let expected = "\
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
\t\t{A}.Release|x64.Build.0 = Release|x64
\t\t{C}.Release|x64.ActiveCfg = Release|x64
\t\t{C}.Release|x64.Build.0 = Release|x64
\tEndGlobalSection
\tGlobalSection(ExtensibilityGlobals) = postSolution
\tEndGlobalSection
\tGlobalSection(ExtensibilityAddIns) = postSolution
\tEndGlobalSection
EndGlobal
";
        assert_eq!(render_solution(&graph, &closure, &options), expected);
    }

    #[test]
    fn test_render_without_inline_dependencies() {
        let (graph, closure) = sample();
        let options = SolutionOptions {
            configuration: "Debug".into(),
            platform: "Win32".into(),
            inline_dependencies: false,
        };
        let text = render_solution(&graph, &closure, &options);
        assert!(!text.contains("{C} = {C}"));
        assert!(text.contains("\t\tDebug|Win32 = Debug|Win32\n"));
    }
}
