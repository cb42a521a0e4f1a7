//! Interactive draft session: the terminal rendition of the rule form.
//! Every answer flows through the draft's mutation methods, so the same
//! bounds and validation hold as for flag-driven edits.

use hivemon_client::editor::RuleDraft;
use hivemon_common::condition::{ConditionField, Operator, Parameter, MAX_CONDITIONS};
use hivemon_common::rule::HiveRecord;

use crate::output::{prompt, theme};

/// Walks the operator through the form: name, hive binding (create only),
/// then the condition rows. Returns false when the operator backs out; the
/// draft keeps whatever was entered so far.
pub fn fill_draft(draft: &mut RuleDraft, hives: &[HiveRecord]) -> bool {
    let current_name = draft.name().to_string();
    let Some(name) = prompt::input_text("Alert name", &current_name) else {
        return false;
    };
    draft.set_name(name.trim());

    if draft.is_edit() {
        theme::print_kv("Hive", &format!("{} (fixed)", draft.hive_id()));
    } else {
        let labels: Vec<String> = hives.iter().map(HiveRecord::selector_label).collect();
        let items: Vec<&str> = labels.iter().map(String::as_str).collect();
        let Some(choice) = prompt::select_option("Hive", &items) else {
            return false;
        };
        draft.set_hive(&hives[choice].id);
    }

    condition_loop(draft)
}

fn condition_loop(draft: &mut RuleDraft) -> bool {
    loop {
        render_rows(draft);

        let mut items: Vec<String> = (1..=draft.conditions().len())
            .map(|n| format!("Edit condition {n}"))
            .collect();
        if draft.conditions().len() < MAX_CONDITIONS {
            items.push("Add condition".into());
        }
        if draft.conditions().len() > 1 {
            items.push("Remove condition".into());
        }
        items.push("Done".into());

        let refs: Vec<&str> = items.iter().map(String::as_str).collect();
        let Some(choice) = prompt::select_option("Trigger conditions", &refs) else {
            return false;
        };

        match refs[choice] {
            "Done" => return true,
            "Add condition" => {
                if draft.add_condition() {
                    let index = draft.conditions().len() - 1;
                    if !edit_row(draft, index) {
                        return false;
                    }
                }
            }
            "Remove condition" => {
                let rows: Vec<String> = (1..=draft.conditions().len())
                    .map(|n| format!("Condition {n}"))
                    .collect();
                let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
                if let Some(index) = prompt::select_option("Remove which?", &row_refs) {
                    draft.remove_condition(index);
                }
            }
            // edit entries come first, so the menu index is the row index
            _ => {
                if !edit_row(draft, choice) {
                    return false;
                }
            }
        }
    }
}

fn edit_row(draft: &mut RuleDraft, index: usize) -> bool {
    let labels: Vec<&str> = Parameter::ALL.iter().map(|p| p.label()).collect();
    let Some(p) = prompt::select_option("Parameter", &labels) else {
        return false;
    };
    draft.update_condition(index, ConditionField::Parameter, Parameter::ALL[p].key());

    let symbols: Vec<&str> = Operator::ALL.iter().map(|o| o.symbol()).collect();
    let Some(o) = prompt::select_option("Operator", &symbols) else {
        return false;
    };
    draft.update_condition(index, ConditionField::Operator, symbols[o]);

    let current = draft
        .conditions()
        .get(index)
        .map(|c| c.value.clone())
        .unwrap_or_default();
    let Some(value) = prompt::input_number("Threshold", &current) else {
        return false;
    };
    draft.update_condition(index, ConditionField::Value, &value);

    true
}

fn render_rows(draft: &RuleDraft) {
    theme::print_section("Trigger Conditions");
    for (i, c) in draft.conditions().iter().enumerate() {
        let rendered = if c.is_complete() {
            format!("{} {} {}", Parameter::label_for(&c.parameter), c.operator, c.value)
        } else {
            "<incomplete>".to_string()
        };
        theme::print_kv(&format!("{}", i + 1), &rendered);
    }
}
