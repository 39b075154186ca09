//! Testing utilities for amend workspace
//!
//! An office testbed: branches, people, money, meetings and assets, with
//! the corrections, groups and custom appliers the integration tests run
//! against.

#![allow(missing_docs)]

use amend_api::{
    Annotation, ApplierContext, ApplierDeclaration, ApplierOutcome, Bean, BeanRef, CorrectionApplier,
    CorrectionDefinition, CorrectionDescriptor, CorrectionError, CorrectionSpec, CorrectionTarget,
    DefaultValue, EnumSchema, EnumValue, GroupDefinition, GroupId, MapKey, PrimitiveKind, PropertyDecl,
    Schema, TypeDescriptor, TypeSchema, Value,
};
use amend_core::{Corrector, CorrectorConfig};
use indexmap::IndexMap;
use std::sync::Arc;

pub const BRANCH_GROUP: &str = "BranchGroup";
pub const REGIONAL_BRANCH_GROUP: &str = "RegionalBranchGroup";
pub const SLOUGH_GROUP: &str = "SloughGroup";
pub const SWINDON_GROUP: &str = "SwindonGroup";
pub const CORPORATE_GROUP: &str = "CorporateGroup";
pub const INVALID_GROUP_SEQUENCE: &str = "InvalidGroupSequence";
pub const INVALID_NESTED_GROUP: &str = "InvalidNestedGroup";
pub const CYCLIC_GROUP: &str = "CyclicGroup";

pub const NOT_NULL: &str = "NotNull";
pub const VALID_MONEY: &str = "ValidMoney";

pub const MONEY_CORRECTION: &str = "MoneyCorrection";
pub const TAG_CORRECTION: &str = "CustomGenericValue1Correction";
pub const AMOUNT_CORRECTION: &str = "CustomGenericValue2Correction";

pub const DEFAULT_TAG: &str = "default CustomGenericValue1Correction value";
pub const DEFAULT_AMOUNT: f64 = 0.0;

// ---------------------------------------------------------------------------
// Custom appliers
// ---------------------------------------------------------------------------

/// Fills in a missing currency on `Money` beans
#[derive(Debug, Default)]
pub struct MoneyCorrectionApplier {
    default_currency: String,
}

impl CorrectionApplier for MoneyCorrectionApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        self.default_currency = spec
            .attribute("defaultCurrency")
            .and_then(Value::as_str)
            .unwrap_or("GBP")
            .to_string();
        Ok(())
    }

    fn correct(&self, value: &Value, _context: &ApplierContext<'_>) -> Result<ApplierOutcome, CorrectionError> {
        let Some(money) = value.as_bean() else {
            return Ok(ApplierOutcome::NoChange);
        };
        if !money.get("currencyCode").is_null() {
            return Ok(ApplierOutcome::NoChange);
        }
        let mut copy = money.snapshot();
        copy.set("currencyCode", Value::from(self.default_currency.as_str()));
        Ok(ApplierOutcome::edited(value.clone(), Value::Bean(BeanRef::new(copy))))
    }
}

/// Replaces blank string tags with a configured default
#[derive(Debug, Default)]
pub struct StringCustomGenericValueApplier {
    default_value: String,
}

impl CorrectionApplier for StringCustomGenericValueApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        self.default_value = spec
            .attribute("defaultValue")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TAG)
            .to_string();
        Ok(())
    }

    fn correct(&self, value: &Value, _context: &ApplierContext<'_>) -> Result<ApplierOutcome, CorrectionError> {
        let blank = match value.as_bean() {
            None => true,
            Some(tag) => tag.get("value").as_str().map_or(true, |s| s.trim().is_empty()),
        };
        if !blank {
            return Ok(ApplierOutcome::NoChange);
        }
        Ok(ApplierOutcome::edited(value.clone(), string_tag(&self.default_value)))
    }
}

/// Replaces non-finite amounts with a configured default
#[derive(Debug, Default)]
pub struct DoubleCustomGenericValueApplier {
    default_value: f64,
}

impl CorrectionApplier for DoubleCustomGenericValueApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        self.default_value = match spec.attribute("defaultValue") {
            Some(Value::F64(v)) => *v,
            _ => DEFAULT_AMOUNT,
        };
        Ok(())
    }

    fn correct(&self, value: &Value, _context: &ApplierContext<'_>) -> Result<ApplierOutcome, CorrectionError> {
        let invalid = match value.as_bean().map(|amount| amount.get("value")) {
            Some(Value::F64(v)) => !v.is_finite(),
            _ => true,
        };
        if !invalid {
            return Ok(ApplierOutcome::NoChange);
        }
        Ok(ApplierOutcome::edited(value.clone(), double_amount(self.default_value)))
    }
}

// ---------------------------------------------------------------------------
// Correction definitions
// ---------------------------------------------------------------------------

fn string_tag_type() -> TypeDescriptor {
    TypeDescriptor::generic("CustomGenericValue", vec![TypeDescriptor::String])
}

fn double_amount_type() -> TypeDescriptor {
    TypeDescriptor::generic("CustomGenericValue", vec![TypeDescriptor::Primitive(PrimitiveKind::F64)])
}

pub fn money_correction_definition() -> Arc<CorrectionDefinition> {
    Arc::new(CorrectionDefinition::new(
        MONEY_CORRECTION,
        vec![ApplierDeclaration::of::<MoneyCorrectionApplier>(
            "MoneyCorrectionApplier",
            TypeDescriptor::bean("Money"),
        )],
    ))
}

pub fn tag_correction_definition() -> Arc<CorrectionDefinition> {
    Arc::new(CorrectionDefinition::new(
        TAG_CORRECTION,
        vec![ApplierDeclaration::of::<StringCustomGenericValueApplier>(
            "StringCustomGenericValueApplier",
            string_tag_type(),
        )],
    ))
}

/// Declared against the boxed double so dispatch exercises boxing
/// compatibility inside generic arguments
pub fn amount_correction_definition() -> Arc<CorrectionDefinition> {
    Arc::new(CorrectionDefinition::new(
        AMOUNT_CORRECTION,
        vec![ApplierDeclaration::of::<DoubleCustomGenericValueApplier>(
            "DoubleCustomGenericValueApplier",
            TypeDescriptor::generic("CustomGenericValue", vec![TypeDescriptor::Boxed(PrimitiveKind::F64)]),
        )],
    ))
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

fn string() -> TypeDescriptor {
    TypeDescriptor::String
}

fn department_default() -> CorrectionDescriptor {
    CorrectionDescriptor::default_value(DefaultValue::enumeration("Department", "SALES"))
}

/// Schema of the office testbed
///
/// Corrections of note:
/// - `Branch.name`, `Branch.address`: trim, address also truncated to 30
/// - `Branch.establishedYear`: defaults to 2001, only on a `NotNull` violation
/// - `Person.catchPhrase`: defaulted in Swindon, prefix stripped in Slough
/// - `Person.emergencyContact`: element trim in the branch group
/// - `Money`: class-level currency fill in Slough; amount default in Swindon
/// - `Company.registrationNumber`: trim on a read-only property
#[must_use]
pub fn office_schema() -> Schema {
    let groups = |names: &[&str]| names.iter().map(|n| GroupId::from(*n)).collect::<Vec<_>>();

    Schema::builder()
        .enumeration(EnumSchema::new("Department", ["SALES", "ACCOUNTING", "HR"]))
        .enumeration(EnumSchema::new(
            "JobTitle",
            [
                "BRANCH_MANAGER",
                "ASSISTANT_TO_THE_BRANCH_MANAGER",
                "SALES_REPRESENTATIVE",
                "ACCOUNTANT",
                "TEMP",
                "RECEPTIONIST",
            ],
        ))
        .group(GroupDefinition::marker(BRANCH_GROUP))
        .group(GroupDefinition::marker(REGIONAL_BRANCH_GROUP).extends(groups(&[BRANCH_GROUP])))
        .group(GroupDefinition::marker(SLOUGH_GROUP))
        .group(GroupDefinition::marker(SWINDON_GROUP))
        .group(GroupDefinition::sequence(CORPORATE_GROUP, groups(&[SLOUGH_GROUP, SWINDON_GROUP])))
        .group(GroupDefinition::sequence(INVALID_GROUP_SEQUENCE, groups(&[CORPORATE_GROUP])))
        .group(GroupDefinition::sequence(INVALID_NESTED_GROUP, groups(&[INVALID_NESTED_GROUP])))
        .group(GroupDefinition::marker(CYCLIC_GROUP).extends(groups(&[CYCLIC_GROUP])))
        .group(GroupDefinition::concrete("Printer"))
        .ty(TypeSchema::new("PhoneNumber").property(
            PropertyDecl::field("number", string())
                .on_field(CorrectionDescriptor::trim())
                .on_field(CorrectionDescriptor::default_value(DefaultValue::string("+44123456789"))),
        ))
        .ty(TypeSchema::new("Asset").property(
            PropertyDecl::new("assignedTo", TypeDescriptor::enumeration("Department")).on_getter(department_default()),
        ))
        .ty(TypeSchema::new("Printer").extends("Asset").property(
            PropertyDecl::field("brand", string())
                .on_field(CorrectionDescriptor::trim())
                .on_field(CorrectionDescriptor::truncate(50)),
        ))
        .ty(TypeSchema::new("Chair")
            .extends("Asset")
            .property(PropertyDecl::field("brand", string()).on_field(CorrectionDescriptor::trim()))
            .property(
                PropertyDecl::field("assignedTo", TypeDescriptor::enumeration("Department"))
                    .on_field(department_default()),
            ))
        .ty(TypeSchema::new("Money")
            .annotate(Annotation::marker(VALID_MONEY))
            .annotate(
                CorrectionDescriptor::custom(&money_correction_definition(), IndexMap::new())
                    .filtered_by([VALID_MONEY])
                    .in_groups([SLOUGH_GROUP]),
            )
            .property(
                PropertyDecl::field("amount", TypeDescriptor::Boxed(PrimitiveKind::F64))
                    .on_field(Annotation::marker(NOT_NULL))
                    .on_field(
                        CorrectionDescriptor::default_value(DefaultValue::double(1.0))
                            .filtered_by([NOT_NULL])
                            .in_groups([SWINDON_GROUP]),
                    ),
            )
            .property(PropertyDecl::field("currencyCode", string())))
        .ty(TypeSchema::new("Person")
            .property(PropertyDecl::field("name", string()))
            .property(
                PropertyDecl::field("catchPhrase", string())
                    .on_field(
                        CorrectionDescriptor::default_value(DefaultValue::string("No catch phrase"))
                            .in_groups([SWINDON_GROUP]),
                    )
                    .on_field(CorrectionDescriptor::regex_replace("Catch Phrase: ", "").in_groups([SLOUGH_GROUP])),
            )
            .property(PropertyDecl::field("jobTitle", TypeDescriptor::enumeration("JobTitle")))
            .property(PropertyDecl::field("salary", TypeDescriptor::bean("Money")).nested())
            .property(
                PropertyDecl::field("emergencyContact", TypeDescriptor::map(string(), string())).on_field(
                    CorrectionDescriptor::trim()
                        .with_target(CorrectionTarget::ContainerElement)
                        .in_groups([BRANCH_GROUP]),
                ),
            ))
        .ty(TypeSchema::new("Branch")
            .property(PropertyDecl::field("name", string()).on_field(CorrectionDescriptor::trim()))
            .property(PropertyDecl::field("manager", TypeDescriptor::bean("Person")).nested())
            .property(PropertyDecl::field("employees", TypeDescriptor::list(TypeDescriptor::bean("Person"))).nested())
            .property(PropertyDecl::field("assets", TypeDescriptor::list(TypeDescriptor::bean("Asset"))).nested())
            .property(
                PropertyDecl::field("address", string())
                    .on_field(CorrectionDescriptor::trim())
                    .on_field(CorrectionDescriptor::truncate(30)),
            )
            .property(
                PropertyDecl::field("establishedYear", TypeDescriptor::Boxed(PrimitiveKind::I32))
                    .on_field(Annotation::marker(NOT_NULL))
                    .on_field(CorrectionDescriptor::default_value(DefaultValue::int(2001)).filtered_by([NOT_NULL])),
            ))
        .ty(TypeSchema::new("Meeting")
            .property(PropertyDecl::field("title", string()).on_field(CorrectionDescriptor::truncate(5)))
            .property(PropertyDecl::field("agenda", string()).on_field(CorrectionDescriptor::trim()))
            .property(
                PropertyDecl::field("participants", TypeDescriptor::array(TypeDescriptor::bean("Person"))).nested(),
            )
            .property(
                PropertyDecl::field("noOfAwkwardMoments", TypeDescriptor::Boxed(PrimitiveKind::I32))
                    .on_field(CorrectionDescriptor::default_value(DefaultValue::int(5))),
            ))
        .ty(TypeSchema::new("Prank")
            .property(PropertyDecl::field("name", string()))
            .property(PropertyDecl::field("prankster", TypeDescriptor::bean("Person")))
            .property(PropertyDecl::field("target", TypeDescriptor::bean("Person"))))
        .ty(TypeSchema::new("CustomGenericValue").property(PropertyDecl::field("value", string())))
        .ty(TypeSchema::new("OfficeDay")
            .property(PropertyDecl::field("branch", TypeDescriptor::bean("Branch")).nested())
            .property(PropertyDecl::field("meetings", TypeDescriptor::list(TypeDescriptor::bean("Meeting"))).nested())
            .property(PropertyDecl::field("pranks", TypeDescriptor::list(TypeDescriptor::bean("Prank"))).nested())
            .property(PropertyDecl::field("expenses", TypeDescriptor::list(TypeDescriptor::bean("Money"))).nested())
            .property(
                PropertyDecl::field("tag", string_tag_type())
                    .on_field(CorrectionDescriptor::custom(&tag_correction_definition(), IndexMap::new())),
            )
            .property(
                PropertyDecl::field("amount", double_amount_type())
                    .on_field(CorrectionDescriptor::custom(&amount_correction_definition(), IndexMap::new())),
            ))
        .ty(TypeSchema::new("Company")
            .property(PropertyDecl::field("name", string()).on_field(CorrectionDescriptor::trim()))
            .property(
                PropertyDecl::field("branches", TypeDescriptor::map(string(), TypeDescriptor::bean("Branch"))).nested(),
            )
            .property(PropertyDecl::field("headquarters", TypeDescriptor::bean("Branch")).nested())
            .property(PropertyDecl::field("establishedYear", TypeDescriptor::Primitive(PrimitiveKind::I32)))
            .property(
                PropertyDecl::field("phoneNumbers", TypeDescriptor::array(TypeDescriptor::bean("PhoneNumber"))).nested(),
            )
            .property(
                PropertyDecl::new("registrationNumber", string())
                    .without_setter()
                    .on_getter(CorrectionDescriptor::trim()),
            ))
        .build()
}

/// Corrector over [`office_schema`] with default configuration
#[must_use]
pub fn corrector() -> Corrector {
    Corrector::new(office_schema())
}

/// Corrector over [`office_schema`] with `config`
#[must_use]
pub fn corrector_with(config: CorrectorConfig) -> Corrector {
    Corrector::builder(office_schema()).config(config).build()
}

#[must_use]
pub fn groups(names: &[&str]) -> Vec<GroupId> {
    names.iter().map(|n| GroupId::from(*n)).collect()
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

#[must_use]
pub fn department(variant: &str) -> Value {
    Value::Enum(EnumValue::new("Department", variant))
}

#[must_use]
pub fn job_title(variant: &str) -> Value {
    Value::Enum(EnumValue::new("JobTitle", variant))
}

#[must_use]
pub fn money(amount: Option<f64>, currency_code: Option<&str>) -> Value {
    Bean::new("Money")
        .with("amount", amount)
        .with("currencyCode", currency_code)
        .build()
}

#[must_use]
pub fn phone_number(number: Option<&str>) -> Value {
    Bean::new("PhoneNumber").with("number", number).build()
}

#[must_use]
pub fn emergency_contacts(entries: &[(&str, &str)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| (MapKey::from(*k), Value::from(*v)))
            .collect(),
    )
}

/// Person with the defaults of a fresh hire: temp, empty salary, no contacts
#[must_use]
pub fn person(name: &str) -> Bean {
    Bean::new("Person")
        .with("name", name)
        .with("catchPhrase", Value::Null)
        .with("jobTitle", job_title("TEMP"))
        .with("salary", money(None, None))
        .with("emergencyContact", emergency_contacts(&[]))
}

#[must_use]
pub fn branch(name: &str, manager: Value) -> Bean {
    Bean::new("Branch")
        .with("name", name)
        .with("manager", manager)
        .with("employees", Value::List(Vec::new()))
        .with("assets", Value::List(Vec::new()))
        .with("address", Value::Null)
        .with("establishedYear", Value::Null)
}

#[must_use]
pub fn printer(brand: &str, assigned_to: Option<&str>) -> Value {
    Bean::new("Printer")
        .with("brand", brand)
        .with("assignedTo", assigned_to.map(department))
        .build()
}

#[must_use]
pub fn chair(brand: &str, assigned_to: Option<&str>) -> Value {
    Bean::new("Chair")
        .with("brand", brand)
        .with("assignedTo", assigned_to.map(department))
        .build()
}

#[must_use]
pub fn meeting(title: &str, agenda: &str, participants: Vec<Value>) -> Bean {
    Bean::new("Meeting")
        .with("title", title)
        .with("agenda", agenda)
        .with("participants", Value::Array(participants))
        .with("noOfAwkwardMoments", Value::Null)
}

#[must_use]
pub fn prank(name: &str, prankster: Value, target: Value) -> Value {
    Bean::new("Prank")
        .with("name", name)
        .with("prankster", prankster)
        .with("target", target)
        .build()
}

#[must_use]
pub fn office_day(branch: Value) -> Bean {
    Bean::new("OfficeDay")
        .with("branch", branch)
        .with("meetings", Value::List(Vec::new()))
        .with("pranks", Value::Null)
        .with("expenses", Value::List(Vec::new()))
        .with("tag", Value::Null)
        .with("amount", Value::Null)
}

#[must_use]
pub fn company(name: &str, headquarters: Value) -> Bean {
    Bean::new("Company")
        .with("name", name)
        .with("branches", Value::Map(IndexMap::new()))
        .with("headquarters", headquarters)
        .with("establishedYear", 1949_i32)
        .with("phoneNumbers", Value::Array(Vec::new()))
        .with("registrationNumber", Value::Null)
}

/// `CustomGenericValue<String>`
#[must_use]
pub fn string_tag(value: &str) -> Value {
    Bean::new("CustomGenericValue")
        .type_args(vec![TypeDescriptor::String])
        .with("value", value)
        .build()
}

/// `CustomGenericValue<f64>`
#[must_use]
pub fn double_amount(value: f64) -> Value {
    Bean::new("CustomGenericValue")
        .type_args(vec![TypeDescriptor::Primitive(PrimitiveKind::F64)])
        .with("value", value)
        .build()
}

/// A clean Scranton branch: nothing in it needs correcting in any group
#[must_use]
pub fn scranton() -> Value {
    let michael = person("Michael Scott")
        .with("catchPhrase", "That's what she said")
        .with("jobTitle", job_title("BRANCH_MANAGER"))
        .with("salary", money(Some(100.0), Some("USD")))
        .build();
    let dwight = person("Dwight Schrute")
        .with("catchPhrase", "Bears. Beets. Battlestar Galactica.")
        .with("salary", money(Some(80.0), Some("USD")))
        .with("emergencyContact", emergency_contacts(&[("farm", "555-0100")]))
        .build();
    branch("Scranton", michael)
        .with("employees", Value::List(vec![dwight]))
        .with("assets", Value::List(vec![printer("Xerox", Some("SALES")), chair("Staples", Some("HR"))]))
        .with("address", "1725 Slough Avenue")
        .with("establishedYear", 1998_i32)
        .build()
}
