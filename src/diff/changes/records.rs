//! Record change computer implementation.

use super::arrow;
use crate::diff::traits::{ChangeComputer, ChangeSet};
use crate::diff::{ChangeKind, DiffEntry, Impact};
use crate::model::{AbiRepresentation, BaseSpecifier, Category, Field, RecordType, TemplateInfo};
use indexmap::IndexMap;

/// Computes layout, inheritance and vtable changes of records.
pub struct RecordChangeComputer;

impl RecordChangeComputer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RecordChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for RecordChangeComputer {
    fn category(&self) -> Category {
        Category::Records
    }

    fn compute(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet {
        let mut result = ChangeSet::new();
        for (o, n) in result.presence(old.records(), new.records()) {
            compare_records(o, n, &mut result);
        }
        result
    }

    fn name(&self) -> &str {
        "records"
    }
}

fn changed(record: &RecordType, impact: Impact, detail: String) -> DiffEntry {
    DiffEntry::new(&record.uid, Category::Records, ChangeKind::Changed, impact, detail)
}

fn compare_records(old: &RecordType, new: &RecordType, out: &mut ChangeSet) {
    if old.template != new.template {
        out.push(changed(
            new,
            Impact::Informational,
            format!(
                "template case {}",
                arrow(describe_template(&old.template), describe_template(&new.template))
            ),
        ));
    }

    match (old.is_opaque, new.is_opaque) {
        (true, true) => return,
        (true, false) => {
            out.push(changed(new, Impact::Informational, "forward declaration completed".to_string()));
            return;
        }
        (false, true) => {
            out.push(changed(
                new,
                Impact::Informational,
                "definition no longer visible (now opaque)".to_string(),
            ));
            return;
        }
        (false, false) => {}
    }

    if old.kind != new.kind {
        out.push(changed(new, Impact::Breaking, format!("kind {}", arrow(old.kind, new.kind))));
    }
    if old.size_bits != new.size_bits {
        out.push(changed(
            new,
            Impact::Breaking,
            format!("size {} bits", arrow(old.size_bits, new.size_bits)),
        ));
    }
    if old.align_bits != new.align_bits {
        out.push(changed(
            new,
            Impact::Breaking,
            format!("alignment {} bits", arrow(old.align_bits, new.align_bits)),
        ));
    }

    compare_bases(old, new, out);
    compare_fields(old, new, out);
    compare_vtable(old, new, out);
}

fn describe_template(template: &TemplateInfo) -> String {
    match template {
        TemplateInfo::Plain => "plain".to_string(),
        TemplateInfo::Instantiation {
            template_name,
            arguments,
        } => format!("{template_name}<{}>", arguments.join(", ")),
    }
}

fn describe_bases(bases: &[BaseSpecifier]) -> String {
    let items: Vec<String> = bases
        .iter()
        .map(|b| {
            let virt = if b.is_virtual { "virtual " } else { "" };
            format!("{virt}{} {}@{}", b.access, b.uid, b.offset_bits)
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn compare_bases(old: &RecordType, new: &RecordType, out: &mut ChangeSet) {
    if old.bases == new.bases {
        return;
    }
    out.push(
        changed(
            new,
            Impact::Breaking,
            format!(
                "base classes {}",
                arrow(describe_bases(&old.bases), describe_bases(&new.bases))
            ),
        )
        .with_member("bases"),
    );
}

/// Old and new fields after pairing, each list in declaration order.
struct FieldPairing<'a> {
    matched: Vec<(&'a Field, &'a Field)>,
    removed: Vec<&'a Field>,
    added: Vec<&'a Field>,
}

/// Pair fields by name. Within a name (unnamed members share the empty one)
/// fields at the same offset pair first, the rest in declaration order.
fn pair_fields<'a>(old: &'a [Field], new: &'a [Field]) -> FieldPairing<'a> {
    type Group<'a> = (Vec<(usize, &'a Field)>, Vec<(usize, &'a Field)>);
    let mut groups: IndexMap<&str, Group<'a>> = IndexMap::new();
    for (i, field) in old.iter().enumerate() {
        groups.entry(field.name.as_str()).or_default().0.push((i, field));
    }
    for (i, field) in new.iter().enumerate() {
        groups.entry(field.name.as_str()).or_default().1.push((i, field));
    }

    let mut matched = Vec::new();
    let mut removed = Vec::new();
    let mut added = Vec::new();
    for (olds, mut news) in groups.into_values() {
        let mut leftover = Vec::new();
        for (i, o) in olds {
            match news.iter().position(|(_, n)| n.offset_bits == o.offset_bits) {
                Some(idx) => matched.push((i, o, news.remove(idx).1)),
                None => leftover.push((i, o)),
            }
        }
        let mut news = news.into_iter();
        for (i, o) in leftover {
            match news.next() {
                Some((_, n)) => matched.push((i, o, n)),
                None => removed.push((i, o)),
            }
        }
        added.extend(news);
    }

    matched.sort_by_key(|(i, _, _)| *i);
    removed.sort_by_key(|(i, _)| *i);
    added.sort_by_key(|(i, _)| *i);
    FieldPairing {
        matched: matched.into_iter().map(|(_, o, n)| (o, n)).collect(),
        removed: removed.into_iter().map(|(_, f)| f).collect(),
        added: added.into_iter().map(|(_, f)| f).collect(),
    }
}

fn compare_fields(old: &RecordType, new: &RecordType, out: &mut ChangeSet) {
    let FieldPairing {
        matched,
        removed: unmatched_old,
        added: mut unmatched_new,
    } = pair_fields(&old.fields, &new.fields);

    for (o, n) in matched {
        compare_field(new, o, n, out);
    }

    // Pair renames: same offset, width and type under a different name.
    let mut removed = Vec::new();
    for field in unmatched_old {
        let rename = unmatched_new.iter().position(|n| {
            n.offset_bits == field.offset_bits
                && n.bit_width == field.bit_width
                && n.type_ref == field.type_ref
        });
        match rename {
            Some(idx) => {
                let renamed = unmatched_new.remove(idx);
                out.push(
                    changed(
                        new,
                        Impact::NonBreaking,
                        format!("field renamed {}", arrow(field.label(), renamed.label())),
                    )
                    .with_member(renamed.label()),
                );
            }
            None => removed.push(field),
        }
    }

    for field in removed {
        out.push(
            DiffEntry::new(
                &new.uid,
                Category::Records,
                ChangeKind::Removed,
                Impact::Breaking,
                format!("field '{}' at offset {} removed", field.label(), field.offset_bits),
            )
            .with_member(field.label()),
        );
    }
    for field in unmatched_new {
        out.push(
            DiffEntry::new(
                &new.uid,
                Category::Records,
                ChangeKind::Added,
                Impact::NonBreaking,
                format!(
                    "field '{}' of type {} added at offset {}",
                    field.label(),
                    field.type_ref,
                    field.offset_bits
                ),
            )
            .with_member(field.label()),
        );
    }
}

fn compare_field(record: &RecordType, old: &Field, new: &Field, out: &mut ChangeSet) {
    let label = new.label();
    let mut push = |impact: Impact, detail: String| {
        out.push(changed(record, impact, detail).with_member(&label));
    };

    if old.offset_bits != new.offset_bits {
        push(
            Impact::Breaking,
            format!("field '{}' offset {}", label, arrow(old.offset_bits, new.offset_bits)),
        );
    }
    if old.bit_width != new.bit_width {
        push(
            Impact::Breaking,
            format!(
                "field '{}' bit width {}",
                label,
                arrow(describe_width(old.bit_width), describe_width(new.bit_width))
            ),
        );
    }
    if old.type_ref != new.type_ref {
        push(
            Impact::Breaking,
            format!("field '{}' type {}", label, arrow(&old.type_ref, &new.type_ref)),
        );
    }
    if old.access != new.access {
        push(
            Impact::Informational,
            format!("field '{}' access {}", label, arrow(old.access, new.access)),
        );
    }
}

fn describe_width(width: Option<u32>) -> String {
    width.map_or_else(|| "none".to_string(), |w| w.to_string())
}

fn compare_vtable(old: &RecordType, new: &RecordType, out: &mut ChangeSet) {
    if old.vtable == new.vtable {
        return;
    }

    let mut diffs = Vec::new();
    for slot in 0..old.vtable.len().max(new.vtable.len()) {
        match (old.vtable.get(slot), new.vtable.get(slot)) {
            (Some(o), Some(n)) if o != n => diffs.push(format!("slot {slot}: {}", arrow(o, n))),
            (Some(o), None) => diffs.push(format!("slot {slot}: {o} removed")),
            (None, Some(n)) => diffs.push(format!("slot {slot}: {n} added")),
            _ => {}
        }
    }

    out.push(
        changed(
            new,
            Impact::Breaking,
            format!(
                "vtable layout changed ({} slots): {}",
                arrow(old.vtable.len(), new.vtable.len()),
                diffs.join("; ")
            ),
        )
        .with_member("vtable"),
    );
}
