//! Guard interpreter

use std::cmp::Ordering;

use super::{BoolOp, CmpOp, GuardExpr};
use crate::domain::value_objects::{AttrValue, AttributeSource};

impl GuardExpr {
    /// Evaluate against event attributes. Missing attributes read as `null`.
    pub fn evaluate(&self, attributes: &dyn AttributeSource) -> bool {
        match self {
            GuardExpr::Literal(value) => value.as_bool().unwrap_or(false),
            GuardExpr::List(_) => false,
            GuardExpr::Identifier(_) => self.value(attributes).as_bool() == Some(true),
            GuardExpr::Boolean { op, operands } => match op {
                BoolOp::And => operands.iter().all(|o| o.evaluate(attributes)),
                BoolOp::Or => operands.iter().any(|o| o.evaluate(attributes)),
                BoolOp::Not => !operands.iter().all(|o| o.evaluate(attributes)),
            },
            GuardExpr::Comparison { op, left, right } => {
                let lhs = left.value(attributes);
                match (op, right.as_ref()) {
                    (CmpOp::In, GuardExpr::List(items)) => items.contains(&lhs),
                    (CmpOp::NotIn, GuardExpr::List(items)) => !items.contains(&lhs),
                    (CmpOp::In | CmpOp::NotIn, _) => false,
                    _ => compare(*op, &lhs, &right.value(attributes)),
                }
            }
        }
    }

    fn value(&self, attributes: &dyn AttributeSource) -> AttrValue {
        match self {
            GuardExpr::Literal(value) => value.clone(),
            GuardExpr::Identifier(name) => attributes.attribute(name).unwrap_or_default(),
            other => AttrValue::Bool(other.evaluate(attributes)),
        }
    }
}

fn compare(op: CmpOp, lhs: &AttrValue, rhs: &AttrValue) -> bool {
    let ordering = lhs.compare(rhs);
    match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Ne => lhs != rhs,
        CmpOp::Lt => ordering == Some(Ordering::Less),
        CmpOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        CmpOp::Gt => ordering == Some(Ordering::Greater),
        CmpOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        CmpOp::In | CmpOp::NotIn => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::guard::{parse_guard, GuardVocabulary};
    use crate::domain::value_objects::{AttrValue, EventAttributes, Number};

    fn eval(src: &str, attrs: &EventAttributes) -> bool {
        parse_guard(src, &GuardVocabulary::default())
            .unwrap()
            .evaluate(attrs)
    }

    fn attrs() -> EventAttributes {
        EventAttributes::new()
            .with("amount", AttrValue::Number("125.50".parse::<Number>().unwrap()))
            .with("currency", "USD")
            .with("is_reversal", false)
            .with("effective_date", "2025-03-01")
            .with("payload.source", "manual")
    }

    #[test]
    fn numeric_comparisons_are_exact() {
        let a = attrs();
        assert!(eval("amount > 125.4", &a));
        assert!(eval("amount == 125.5", &a));
        assert!(eval("amount <= 125.50", &a));
        assert!(!eval("amount < 0", &a));
    }

    #[test]
    fn boolean_operators() {
        let a = attrs();
        assert!(eval("amount > 0 and currency == 'USD'", &a));
        assert!(eval("not is_reversal", &a));
        assert!(!eval("is_reversal or currency == 'EUR'", &a));
    }

    #[test]
    fn membership() {
        let a = attrs();
        assert!(eval("currency in ['USD', 'CAD']", &a));
        assert!(eval("currency not in ['EUR']", &a));
        assert!(!eval("currency in []", &a));
    }

    #[test]
    fn missing_attributes_read_as_null() {
        let a = attrs();
        assert!(eval("counterparty == null", &a));
        assert!(!eval("counterparty > 0", &a));
        assert!(!eval("counterparty", &a));
    }

    #[test]
    fn mismatched_kinds_never_order() {
        let a = attrs();
        assert!(!eval("currency > 5", &a));
        assert!(!eval("currency < 5", &a));
        assert!(eval("currency != 5", &a));
    }

    #[test]
    fn iso_dates_compare_as_text() {
        let a = attrs();
        assert!(eval("effective_date >= '2025-01-01'", &a));
        assert!(!eval("effective_date < '2025-01-01'", &a));
    }

    #[test]
    fn member_access_reads_dotted_attribute() {
        assert!(eval("payload.source == 'manual'", &attrs()));
    }
}
