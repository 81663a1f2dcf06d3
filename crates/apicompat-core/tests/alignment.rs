//! End-to-end tests for mapping construction and traversal through the public API.

use std::sync::Arc;

use apicompat_core::filters::{
    DocIdExcludeListFilter, IntersectionFilter, MappingDifferenceFilter, PublicOnlyFilter,
    SeverityFilter,
};
use apicompat_core::{
    ApiFilter, AssemblyDefinition, AssemblySet, AssemblySetMapping, Difference, DifferenceRule,
    DifferenceTraverser, DifferenceType, DifferenceVisitor, Differences, MappingSettings,
    MemberDefinition, MemberRef, RuleSet, TypeDefinition, Visibility,
};

/// Reports every one-sided type or member.
struct Presence;

impl DifferenceRule for Presence {
    fn name(&self) -> &'static str {
        "Presence"
    }

    fn diff_types(
        &self,
        differences: &mut Differences<'_>,
        implementation: Option<&TypeDefinition>,
        contract: Option<&TypeDefinition>,
    ) -> DifferenceType {
        match (contract, implementation) {
            (Some(c), None) => {
                differences.add_incompatible(self.name(), format!("removed {}", c.full_name()));
                DifferenceType::Removed
            }
            (None, Some(i)) => {
                differences.add_incompatible(self.name(), format!("added {}", i.full_name()));
                DifferenceType::Added
            }
            _ => DifferenceType::Unknown,
        }
    }

    fn diff_members(
        &self,
        differences: &mut Differences<'_>,
        implementation: Option<MemberRef<'_>>,
        contract: Option<MemberRef<'_>>,
    ) -> DifferenceType {
        match (contract, implementation) {
            (Some(c), None) => {
                differences.add_incompatible(self.name(), format!("removed {}", c.full_name()));
                DifferenceType::Removed
            }
            _ => DifferenceType::Unknown,
        }
    }
}

#[derive(Default)]
struct Lines(Vec<String>);

impl DifferenceVisitor for Lines {
    type Error = std::convert::Infallible;

    fn enter_assembly(&mut self, name: &str) -> Result<(), Self::Error> {
        self.0.push(format!("[{name}]"));
        Ok(())
    }

    fn leave_assembly(&mut self, _name: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_difference(&mut self, difference: &Difference) -> Result<(), Self::Error> {
        self.0.push(difference.to_string());
        Ok(())
    }
}

fn contract() -> AssemblySet {
    AssemblySet::new("v1").with_assembly(
        AssemblyDefinition::new("Lib")
            .with_type(
                TypeDefinition::class("Lib", "Widget")
                    .with_member(MemberDefinition::method("Draw"))
                    .with_member(MemberDefinition::method("Resize")),
            )
            .with_type(TypeDefinition::class("Lib", "Legacy"))
            .with_type(TypeDefinition::class("Lib", "Hidden").with_visibility(Visibility::Assembly))
            .with_type(TypeDefinition::class("Lib.Extra", "Helper")),
    )
}

fn implementation() -> AssemblySet {
    AssemblySet::new("v2").with_assembly(
        AssemblyDefinition::new("Lib")
            .with_type(TypeDefinition::class("Lib", "Widget").with_member(MemberDefinition::method("Draw")))
            .with_type(TypeDefinition::class("Lib", "Gadget"))
            .with_type(TypeDefinition::class("Lib.Extra", "Helper")),
    )
}

fn run(filter: Arc<dyn ApiFilter>) -> Vec<String> {
    let contract = contract();
    let implementation = implementation();
    let settings = MappingSettings::new(filter.clone(), Arc::new(RuleSet::from_rules(vec![Box::new(Presence)])));
    let mapping = AssemblySetMapping::between(&settings, &contract, &implementation).unwrap();
    let mapping_filter = MappingDifferenceFilter::changes_only(filter);
    let difference_filter = SeverityFilter::default();
    let mut lines = Lines::default();
    DifferenceTraverser::new(&mapping_filter, &difference_filter)
        .traverse(&mapping, &mut lines)
        .unwrap();
    lines.0
}

#[test]
fn reports_removals_and_additions_in_contract_order() {
    let lines = run(Arc::new(PublicOnlyFilter::new()));
    assert_eq!(
        lines,
        vec![
            "[Lib]",
            "Presence: removed Lib.Widget.Resize()",
            "Presence: removed Lib.Legacy",
            "Presence: added Lib.Gadget",
        ]
    );
}

#[test]
fn running_twice_gives_identical_output() {
    let filter: Arc<dyn ApiFilter> = Arc::new(PublicOnlyFilter::new());
    assert_eq!(run(filter.clone()), run(filter));
}

#[test]
fn excluded_doc_ids_drop_out_of_the_comparison() {
    let filter: Arc<dyn ApiFilter> = Arc::new(IntersectionFilter::new(
        Arc::new(PublicOnlyFilter::new()),
        Arc::new(DocIdExcludeListFilter::new(["T:Lib.Legacy", "M:Lib.Widget.Resize"])),
    ));
    assert_eq!(run(filter), vec!["[Lib]", "Presence: added Lib.Gadget"]);
}

#[test]
fn classification_follows_slot_occupancy() {
    let contract = contract();
    let implementation = implementation();
    let settings = MappingSettings::new(Arc::new(PublicOnlyFilter::new()), Arc::new(RuleSet::default()));
    let mapping = AssemblySetMapping::between(&settings, &contract, &implementation).unwrap();

    let assembly = mapping.assemblies().next().unwrap();
    let lib = assembly.namespaces().next().unwrap();
    let classified: Vec<_> = lib
        .types()
        .map(|t| (t.representative().unwrap().name.as_str(), t.difference()))
        .collect();
    assert_eq!(
        classified,
        vec![
            ("Widget", DifferenceType::Unchanged),
            ("Legacy", DifferenceType::Removed),
            ("Gadget", DifferenceType::Added),
        ]
    );

    let widget = lib.type_mapping("T:Lib.Widget").unwrap();
    assert_eq!(widget.member("M:Lib.Widget.Resize").unwrap().difference(), DifferenceType::Removed);
    assert_eq!(widget.member("M:Lib.Widget.Draw").unwrap().difference(), DifferenceType::Unchanged);
}
