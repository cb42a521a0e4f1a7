use std::fmt;
use std::str::FromStr;

/// A rule carries between one and four trigger conditions.
pub const MIN_CONDITIONS: usize = 1;
pub const MAX_CONDITIONS: usize = 4;

/// Sensor channels a condition can watch. This is the closed vocabulary
/// offered at the editing boundary; persisted data may carry keys outside
/// it (written before a channel was retired or after one was added) and
/// those pass through display unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Temperature,
    ExternalTemperature,
    Humidity,
    Co2,
    Sound,
    Weight,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Temperature,
        Parameter::ExternalTemperature,
        Parameter::Humidity,
        Parameter::Co2,
        Parameter::Sound,
        Parameter::Weight,
    ];

    /// Wire key, exactly as stored inside `triggerConditions`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::ExternalTemperature => "externalTemperature",
            Self::Humidity => "humidity",
            Self::Co2 => "co2",
            Self::Sound => "sound",
            Self::Weight => "weight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Int. Temperature",
            Self::ExternalTemperature => "Ext. Temperature",
            Self::Humidity => "Humidity",
            Self::Co2 => "CO₂",
            Self::Sound => "Sound Level",
            Self::Weight => "Weight",
        }
    }

    /// Display label for an arbitrary persisted key. Unrecognized keys are
    /// shown as-is, capitalization untouched.
    pub fn label_for(key: &str) -> &str {
        for p in Self::ALL {
            if p.key() == key {
                return p.label();
            }
        }
        key
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| format!("unknown sensor parameter: {s}"))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Comparison operators accepted by the remote evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterOrEqual),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessOrEqual),
            _ => Err(format!("unknown comparison operator: {s}")),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One threshold comparison. Fields hold the raw strings the wire carries;
/// rows written by older clients survive a decode/display cycle untouched.
/// The `Parameter`/`Operator` enums constrain what the editor itself will
/// accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCondition {
    pub parameter: String,
    pub operator: String,
    pub value: String,
}

impl TriggerCondition {
    /// The empty row the editor starts from.
    pub fn blank() -> Self {
        Self {
            parameter: String::new(),
            operator: Operator::default().symbol().to_string(),
            value: String::new(),
        }
    }

    pub fn new(parameter: Parameter, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.key().to_string(),
            operator: operator.symbol().to_string(),
            value: value.into(),
        }
    }

    /// Complete rows are the only ones ever transmitted. A row missing its
    /// parameter or value may exist transiently in the editor.
    pub fn is_complete(&self) -> bool {
        !self.parameter.is_empty() && !self.value.is_empty()
    }
}

impl Default for TriggerCondition {
    fn default() -> Self {
        Self::blank()
    }
}

/// Which field of a condition row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionField {
    Parameter,
    Operator,
    Value,
}

/// An ordered, AND-combined group of trigger conditions. Always holds at
/// least one row; never more than four. Duplicate parameters are allowed:
/// two temperature bounds form a range check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    items: Vec<TriggerCondition>,
}

impl ConditionSet {
    /// A set with a single blank row, ready for authoring.
    pub fn new_blank() -> Self {
        Self {
            items: vec![TriggerCondition::blank()],
        }
    }

    /// Builds a set from decoded rows, substituting one blank row when the
    /// input is empty so the editor always has something to show. Oversized
    /// persisted sets are kept intact; the bound applies to authoring only.
    pub fn from_conditions(items: Vec<TriggerCondition>) -> Self {
        if items.is_empty() {
            Self::new_blank()
        } else {
            Self { items }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TriggerCondition> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerCondition> {
        self.items.iter()
    }

    /// Appends a blank row. Refused once the set holds four rows.
    pub fn add_blank(&mut self) -> bool {
        if self.items.len() >= MAX_CONDITIONS {
            return false;
        }
        self.items.push(TriggerCondition::blank());
        true
    }

    /// Removes the row at `index`. Refused when only one row remains.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.items.len() <= MIN_CONDITIONS || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Replaces one field of one row; other rows are untouched.
    pub fn update_field(&mut self, index: usize, field: ConditionField, value: &str) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        match field {
            ConditionField::Parameter => item.parameter = value.to_string(),
            ConditionField::Operator => item.operator = value.to_string(),
            ConditionField::Value => item.value = value.to_string(),
        }
        true
    }

    /// The subsequence of complete rows, which is the subset actually
    /// transmitted.
    pub fn complete_subset(&self) -> Vec<TriggerCondition> {
        self.items
            .iter()
            .filter(|c| c.is_complete())
            .cloned()
            .collect()
    }

    pub fn has_complete(&self) -> bool {
        self.items.iter().any(|c| c.is_complete())
    }
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self::new_blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_row_defaults() {
        let c = TriggerCondition::blank();
        assert_eq!(c.parameter, "");
        assert_eq!(c.operator, ">");
        assert_eq!(c.value, "");
        assert!(!c.is_complete());
    }

    #[test]
    fn add_capped_at_four() {
        let mut set = ConditionSet::new_blank();
        assert!(set.add_blank());
        assert!(set.add_blank());
        assert!(set.add_blank());
        assert_eq!(set.len(), 4);
        assert!(!set.add_blank());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn remove_floored_at_one() {
        let mut set = ConditionSet::new_blank();
        set.add_blank();
        assert!(set.remove(1));
        assert_eq!(set.len(), 1);
        assert!(!set.remove(0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_out_of_range_refused() {
        let mut set = ConditionSet::new_blank();
        set.add_blank();
        assert!(!set.remove(5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn update_field_touches_one_row() {
        let mut set = ConditionSet::new_blank();
        set.add_blank();
        assert!(set.update_field(1, ConditionField::Parameter, "co2"));
        assert!(set.update_field(1, ConditionField::Value, "400"));
        assert_eq!(set.get(0).unwrap().parameter, "");
        assert_eq!(set.get(1).unwrap().parameter, "co2");
        assert_eq!(set.get(1).unwrap().value, "400");
    }

    #[test]
    fn complete_subset_skips_partial_rows() {
        let mut set = ConditionSet::new_blank();
        set.update_field(0, ConditionField::Parameter, "temperature");
        set.update_field(0, ConditionField::Value, "38");
        set.add_blank();
        set.update_field(1, ConditionField::Parameter, "humidity");
        // second row has no value: incomplete

        let complete = set.complete_subset();
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].parameter, "temperature");
        assert!(set.has_complete());
    }

    #[test]
    fn duplicate_parameters_allowed() {
        let mut set = ConditionSet::new_blank();
        set.update_field(0, ConditionField::Parameter, "temperature");
        set.update_field(0, ConditionField::Value, "38");
        set.add_blank();
        set.update_field(1, ConditionField::Parameter, "temperature");
        set.update_field(1, ConditionField::Operator, "<");
        set.update_field(1, ConditionField::Value, "10");
        assert_eq!(set.complete_subset().len(), 2);
    }

    #[test]
    fn from_conditions_substitutes_blank_when_empty() {
        let set = ConditionSet::from_conditions(Vec::new());
        assert_eq!(set.len(), 1);
        assert_eq!(*set.get(0).unwrap(), TriggerCondition::blank());
    }

    #[test]
    fn parameter_vocabulary() {
        assert_eq!("co2".parse::<Parameter>().unwrap(), Parameter::Co2);
        assert_eq!(
            "externalTemperature".parse::<Parameter>().unwrap(),
            Parameter::ExternalTemperature
        );
        assert!("voltage".parse::<Parameter>().is_err());
    }

    #[test]
    fn parameter_labels() {
        assert_eq!(Parameter::label_for("temperature"), "Int. Temperature");
        assert_eq!(Parameter::label_for("co2"), "CO₂");
        assert_eq!(Parameter::label_for("magnetism"), "magnetism");
    }

    #[test]
    fn operator_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
        }
        assert!("=".parse::<Operator>().is_err());
    }
}
