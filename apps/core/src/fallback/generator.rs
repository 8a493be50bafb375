//! Scenario content generation.
//!
//! Chooses a fixture variant per payload schema from the signal profile and
//! returns the matching canned payload. The literal content is in
//! [`super::fixtures`].

use crate::catalog::{ModuleId, PayloadKind};
use crate::payloads::ModuleData;

use super::fixtures::{
    self, AppVariant, ContentVariant, MarketVariant, NoteVariant, OperationsVariant, PlanVariant,
    SalesAudience, StructureVariant, ValuePitch,
};
use super::signals::SignalProfile;

pub fn structure_variant(profile: &SignalProfile) -> StructureVariant {
    if profile.startup {
        StructureVariant::Startup
    } else {
        StructureVariant::Established
    }
}

pub fn market_variant(profile: &SignalProfile) -> MarketVariant {
    if profile.startup {
        MarketVariant::Startup
    } else if profile.personal {
        MarketVariant::Personal
    } else {
        MarketVariant::Established
    }
}

pub fn sales_variant(profile: &SignalProfile) -> (SalesAudience, ValuePitch) {
    let audience = if profile.personal {
        SalesAudience::Individual
    } else {
        SalesAudience::Business
    };
    let pitch = if profile.startup {
        ValuePitch::Disruptive
    } else {
        ValuePitch::Heritage
    };
    (audience, pitch)
}

pub fn plan_variant(profile: &SignalProfile) -> PlanVariant {
    if profile.startup {
        PlanVariant::Startup
    } else if profile.personal {
        PlanVariant::SideBusiness
    } else {
        PlanVariant::Established
    }
}

pub fn operations_variant(profile: &SignalProfile) -> OperationsVariant {
    if profile.corporate {
        OperationsVariant::Corporate
    } else {
        OperationsVariant::SmallBusiness
    }
}

pub fn content_variant(profile: &SignalProfile) -> ContentVariant {
    if profile.personal {
        ContentVariant::Personal
    } else {
        ContentVariant::Business
    }
}

pub fn app_variant(profile: &SignalProfile) -> AppVariant {
    if profile.startup {
        AppVariant::Startup
    } else {
        AppVariant::Established
    }
}

pub fn note_variant(profile: &SignalProfile) -> NoteVariant {
    if profile.startup {
        NoteVariant::Startup
    } else {
        NoteVariant::Established
    }
}

/// Payload for `module` under `profile`, or `None` when the module has no
/// payload schema.
pub fn generate(module: ModuleId, profile: &SignalProfile) -> Option<ModuleData> {
    let data = match module.payload_kind()? {
        PayloadKind::Structure => {
            ModuleData::Structure(fixtures::structure(structure_variant(profile)))
        }
        PayloadKind::Market => ModuleData::Market(fixtures::market(market_variant(profile))),
        PayloadKind::Trends => ModuleData::Trends(fixtures::trends()),
        PayloadKind::Sales => {
            let (audience, pitch) = sales_variant(profile);
            ModuleData::Sales(fixtures::sales(audience, pitch))
        }
        PayloadKind::BusinessPlan => {
            ModuleData::BusinessPlan(fixtures::business_plan(plan_variant(profile)))
        }
        PayloadKind::Operations => {
            ModuleData::Operations(fixtures::operations(operations_variant(profile)))
        }
        PayloadKind::Content => ModuleData::Content(fixtures::content(content_variant(profile))),
        PayloadKind::App => ModuleData::App(fixtures::app(app_variant(profile))),
        PayloadKind::Simulation => ModuleData::Simulation(fixtures::simulation()),
        PayloadKind::Custom => ModuleData::Custom(fixtures::custom()),
    };
    Some(data)
}
