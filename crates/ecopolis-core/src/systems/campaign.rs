//! Awareness campaigns - pay to lift happiness and recycling, with a
//! cooldown between campaigns.

use ecopolis_logic::config::GameConfig;

use crate::error::CommandError;
use crate::notify::Outbox;
use crate::state::{CityState, ResourceKind};

/// One day passes on the campaign cooldown.
pub fn tick_cooldowns(state: &mut CityState) {
    state.campaign_cooldown = state.campaign_cooldown.saturating_sub(1);
}

pub fn campaign_available(state: &CityState, config: &GameConfig) -> bool {
    state.campaign_cooldown == 0 && state.money >= config.campaign_cost as f64
}

/// Run an awareness campaign.
pub fn launch_campaign(
    state: &mut CityState,
    config: &GameConfig,
    outbox: &mut Outbox,
) -> Result<(), CommandError> {
    if state.campaign_cooldown > 0 {
        return Err(CommandError::CampaignCooldown {
            days_left: state.campaign_cooldown,
        });
    }
    if state.money < config.campaign_cost as f64 {
        return Err(CommandError::InsufficientFunds {
            needed: config.campaign_cost,
            available: state.money,
        });
    }

    let effect = &config.campaign_effect;
    state.update_resource(ResourceKind::Money, -(config.campaign_cost as f64));
    state.update_resource(ResourceKind::Happiness, effect.happiness);
    state.update_resource(ResourceKind::Pollution, effect.pollution);
    state.update_resource(ResourceKind::Recycling, effect.recycling);
    state.campaign_cooldown = config.campaign_cooldown_days;

    outbox.info("📢 Awareness campaign launched! The city is more aware and happier.");
    log::info!("Day {}: awareness campaign launched", state.day);
    Ok(())
}
