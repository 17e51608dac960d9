use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use ledgerpack::config::Config;
use ledgerpack::domain::value_objects::{format_date, AttrValue};
use ledgerpack::infrastructure::FsSetCatalog;
use ledgerpack::{Dispatch, PolicySelector, PostingEvent, ScopeQuery};

pub struct SelectArgs<'a> {
    pub dir: &'a Path,
    pub event_type: &'a str,
    pub as_of: NaiveDate,
    pub scope: ScopeQuery,
    pub attrs: Vec<(String, AttrValue)>,
}

/// Structural dispatch when no attributes are given; guards are evaluated
/// otherwise.
pub fn cmd_select(args: SelectArgs<'_>, config: &Config, json: bool) -> Result<()> {
    let pack = super::pipeline(config).compile_dir(&FsSetCatalog::new(), args.dir)?;
    let selector = PolicySelector::new(&pack);

    let guarded = !args.attrs.is_empty();
    let dispatch = if guarded {
        let event = args
            .attrs
            .into_iter()
            .fold(
                PostingEvent::new(args.event_type, args.as_of, args.scope),
                |event, (name, value)| event.with_attribute(name, value),
            );
        selector.select_event(&event)
    } else {
        selector.select(args.event_type, args.as_of, &args.scope)
    };

    if json {
        let policy = dispatch.policy();
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "select",
            "event_type": args.event_type,
            "as_of": format_date(args.as_of),
            "guards_evaluated": guarded,
            "matched": dispatch.is_match(),
            "policy": policy.map(|p| p.name()),
            "precedence": policy.map(|p| p.precedence()),
        }));
        return Ok(());
    }

    match dispatch {
        Dispatch::Matched(policy) => {
            println!(
                "✓ {} (precedence {}, specificity {})",
                policy.name(),
                policy.precedence(),
                policy.specificity()
            );
            for effect in policy.effects() {
                println!(
                    "  {}: debit {} / credit {}",
                    effect.ledger, effect.debit_role, effect.credit_role
                );
            }
        }
        Dispatch::NoMatch => println!("No policy matches {} on {}", args.event_type, format_date(args.as_of)),
    }
    Ok(())
}
