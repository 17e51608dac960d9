//! Test fixtures - reusable configuration set content.

/// Root descriptor of the ACME budget set.
pub const ACME_ROOT: &str = r#"# ACME budget controls
config_id: acme-budget
version: 3
status: PUBLISHED
scope:
  legal_entity: ACME
  jurisdiction: US
  effective_from: 2024-01-01
role_bindings:
  - role: BUDGET_CONTROL
    ledger: BUDGET
    account_code: "9100"
  - role: BUDGET_OFFSET
    ledger: BUDGET
    account_code: "9900"
capabilities:
  multi_currency: false
controls:
  approval_limit: 25000
"#;

/// Budget policies, including one that needs the variance engine.
pub const ACME_BUDGET_POLICIES: &str = r#"policies:
  - name: budget_entry
    trigger: { event_type: budget.entry }
    meaning: { economic_type: BUDGET_COMMITMENT }
    ledger_effects:
      - ledger: BUDGET
        debit_role: BUDGET_CONTROL
        credit_role: BUDGET_OFFSET
    guards:
      - "amount > 0"
    precedence: 1
  - name: budget_entry_large
    trigger: { event_type: budget.entry }
    meaning: { economic_type: BUDGET_COMMITMENT }
    ledger_effects:
      - ledger: BUDGET
        debit_role: BUDGET_CONTROL
        credit_role: BUDGET_OFFSET
    guards:
      - "amount >= 25000"
    precedence: 5
    required_engines: [variance]
    engine_parameters_ref: std_variance
engine_parameters:
  std_variance:
    engine: variance
    parameters:
      tolerance_percent: 2.5
"#;

/// Expense policies and the GL bindings they need.
pub const ACME_EXPENSE_POLICIES: &str = r#"role_bindings:
  - role: EXPENSE
    ledger: GL
    account_code: "6000"
  - role: CASH
    ledger: GL
    account_code: "1000"
policies:
  - name: expense_paid
    trigger: { event_type: expense.paid }
    meaning: { economic_type: EXPENSE }
    ledger_effects:
      - ledger: GL
        debit_role: EXPENSE
        credit_role: CASH
  - name: expense_paid_fx
    trigger: { event_type: expense.paid }
    meaning: { economic_type: EXPENSE }
    ledger_effects:
      - ledger: GL
        debit_role: EXPENSE
        credit_role: CASH
    guards:
      - "currency != 'USD'"
    precedence: 2
    capability_tags: [multi_currency]
"#;

/// A wildcard set that applies to every legal entity.
pub const SHARED_ROOT: &str = r#"config_id: shared
version: 1
status: PUBLISHED
scope:
  legal_entity: "*"
role_bindings:
  - role: EXPENSE
    ledger: GL
  - role: CASH
    ledger: GL
policies:
  - name: expense_paid
    trigger: { event_type: expense.paid }
    meaning: { economic_type: EXPENSE }
    ledger_effects:
      - ledger: GL
        debit_role: EXPENSE
        credit_role: CASH
"#;

/// One defect for each of the four validator checks.
pub const BROKEN_ROOT: &str = r#"config_id: broken
version: 1
status: DRAFT
scope:
  legal_entity: ACME
role_bindings:
  - role: CASH
    ledger: GL
policies:
  - name: unknown_key
    trigger: { event_type: a.event }
    meaning: { economic_type: X }
    colour: blue
    ledger_effects:
      - { ledger: GL, debit_role: CASH, credit_role: REVENUE }
  - name: bad_guard
    trigger: { event_type: b.event }
    meaning: { economic_type: X }
    guards:
      - "len(memo) > 3"
    ledger_effects:
      - { ledger: GL, debit_role: CASH, credit_role: CASH_CLEARING }
  - name: twin_one
    trigger: { event_type: c.event }
    meaning: { economic_type: X }
    ledger_effects:
      - { ledger: GL, debit_role: CASH, credit_role: CASH_CLEARING }
  - name: twin_two
    trigger: { event_type: c.event }
    meaning: { economic_type: X }
    ledger_effects:
      - { ledger: GL, debit_role: CASH, credit_role: CASH_CLEARING }
"#;
