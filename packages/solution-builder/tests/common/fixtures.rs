//! Descriptor fixtures
//!
//! Native fixtures set `CLRSupport=false`; a native descriptor without it
//! counts as managed.

use super::builders::DescriptorBuilder;

/// Managed project producing `<assembly>.dll`, referencing `references`
pub fn fixture_managed(id: &str, assembly: &str, references: &[&str]) -> DescriptorBuilder {
    references.iter().fold(
        DescriptorBuilder::new()
            .property("ProjectGuid", id)
            .property("AssemblyName", assembly),
        |builder, reference| builder.item("Reference", reference),
    )
}

/// Native dynamic library linking `inputs` (`;`-joined)
pub fn fixture_native_dll(id: &str, target: &str, inputs: &[&str]) -> DescriptorBuilder {
    let mut builder = DescriptorBuilder::new()
        .property("ProjectGuid", id)
        .property("TargetName", target)
        .property("TargetExt", ".dll")
        .property("CLRSupport", "false");
    if !inputs.is_empty() {
        let deps = format!("{};%(AdditionalDependencies)", inputs.join(";"));
        builder = builder.definition("Link", "AdditionalDependencies", &deps);
    }
    builder
}

/// Native static library
pub fn fixture_native_lib(id: &str, target: &str) -> DescriptorBuilder {
    DescriptorBuilder::new()
        .property("ProjectGuid", id)
        .property("TargetName", target)
        .property("TargetExt", ".lib")
        .property("CLRSupport", "false")
}

/// Manifest listing `seeds` under `items_name`, plus explicit directives
pub fn fixture_manifest(items_name: &str, seeds: &[&str], extra: &[(&str, &str)]) -> DescriptorBuilder {
    let builder = seeds
        .iter()
        .fold(DescriptorBuilder::new(), |builder, seed| builder.item(items_name, seed));
    extra.iter().fold(builder, |builder, (project, depends_on)| {
        builder.item_with("ExtraDependencies", project, &[("DependsOn", depends_on)])
    })
}
