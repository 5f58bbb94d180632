//! Session domain: login, logout and progress updates for the player record.
//!
//! Persistence is requested through `SaveUserProgressEvent`; this module never
//! touches storage itself.

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::shared::*;

pub const DEFAULT_MONEY: u32 = 100;

/// Seeds a brand-new player record starts with.
pub fn default_seeds() -> HashMap<CropType, u32> {
    HashMap::from([(CropType::Wheat, 5), (CropType::Corn, 3), (CropType::Tomato, 2)])
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    /// Derived from the username when absent.
    pub id: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("username must not be blank")]
    BlankUsername,
    #[error("nobody is logged in")]
    NotLoggedIn,
}

/// Lowercase alphanumerics, everything else collapsed to `-`.
pub fn user_id_from_username(username: &str) -> String {
    let mut id = String::new();
    for c in username.trim().chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c.to_ascii_lowercase());
        } else if !id.ends_with('-') && !id.is_empty() {
            id.push('-');
        }
    }
    let id = id.trim_end_matches('-').to_string();
    if id.is_empty() {
        "guest".to_string()
    } else {
        id
    }
}

pub fn login(session: &mut Session, request: LoginRequest, now: u64) -> Result<&User, SessionError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(SessionError::BlankUsername);
    }
    let id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| user_id_from_username(username));

    let user = User {
        id,
        username: username.to_string(),
        email: request.email.unwrap_or_default(),
        avatar: request.avatar,
        farm_level: 1,
        experience: 0,
        achievements: Vec::new(),
        resources: ResourceLedger::new(DEFAULT_MONEY, default_seeds()),
        last_login: now,
    };
    Ok(session.user.insert(user))
}

pub fn logout(session: &mut Session) {
    session.user = None;
}

/// Adds experience, recomputes the farm level, and unions in `achievements`.
pub fn update_progress<'a>(
    session: &'a mut Session,
    experience: u64,
    achievements: &[String],
) -> Result<&'a User, SessionError> {
    let user = session.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
    user.experience = user.experience.saturating_add(experience);
    user.farm_level = farm_level_for(user.experience).level;
    for id in achievements {
        if !user.has_achievement(id) {
            user.achievements.push(id.clone());
        }
    }
    Ok(user)
}

// ─────────────────────────────────────────────────────────────────────────────
// Events & systems
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub struct LoginRequestEvent(pub LoginRequest);

#[derive(Event, Debug, Clone, Default)]
pub struct LogoutEvent;

#[derive(Event, Debug, Clone, Default)]
pub struct UpdateProgressEvent {
    pub experience: u64,
    pub achievements: Vec<String>,
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LoginRequestEvent>()
            .add_event::<LogoutEvent>()
            .add_event::<UpdateProgressEvent>()
            .add_systems(
                Update,
                (
                    handle_login,
                    handle_logout,
                    record_unlocked_achievements,
                    handle_progress_updates,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn handle_login(
    mut requests: EventReader<LoginRequestEvent>,
    mut session: ResMut<Session>,
    mut save: EventWriter<SaveUserProgressEvent>,
) {
    for LoginRequestEvent(request) in requests.read() {
        match login(&mut session, request.clone(), current_timestamp()) {
            Ok(user) => {
                info!("[Session] '{}' logged in as {}", user.username, user.id);
                save.send(SaveUserProgressEvent);
            }
            Err(e) => warn!("[Session] Login refused: {}", e),
        }
    }
}

pub fn handle_logout(mut events: EventReader<LogoutEvent>, mut session: ResMut<Session>) {
    if events.read().count() > 0 && session.user.is_some() {
        logout(&mut session);
        info!("[Session] Logged out");
    }
}

/// Mirrors newly unlocked achievements into the player record.
pub fn record_unlocked_achievements(
    mut unlocked: EventReader<AchievementUnlockedEvent>,
    mut updates: EventWriter<UpdateProgressEvent>,
) {
    let achievements: Vec<String> = unlocked.read().map(|ev| ev.achievement_id.clone()).collect();
    if !achievements.is_empty() {
        updates.send(UpdateProgressEvent {
            experience: 0,
            achievements,
        });
    }
}

pub fn handle_progress_updates(
    mut requests: EventReader<UpdateProgressEvent>,
    mut session: ResMut<Session>,
    mut save: EventWriter<SaveUserProgressEvent>,
) {
    for ev in requests.read() {
        match update_progress(&mut session, ev.experience, &ev.achievements) {
            Ok(user) => {
                debug!(
                    "[Session] {} now level {} with {} XP",
                    user.username, user.farm_level, user.experience
                );
                save.send(SaveUserProgressEvent);
            }
            Err(e) => debug!("[Session] Progress update ignored: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_login_fills_defaults() {
        let mut session = Session::default();
        let user = login(&mut session, request("Farmer Jane"), 42).unwrap();
        assert_eq!(user.id, "farmer-jane");
        assert_eq!(user.farm_level, 1);
        assert_eq!(user.resources.money, 100);
        assert_eq!(user.resources.seeds(CropType::Wheat), 5);
        assert_eq!(user.resources.seeds(CropType::Potato), 0);
        assert_eq!(user.last_login, 42);
        assert_eq!(session.user_id(), Some("farmer-jane"));
    }

    #[test]
    fn test_blank_username_rejected() {
        let mut session = Session::default();
        assert_eq!(login(&mut session, request("   "), 0).err(), Some(SessionError::BlankUsername));
        assert!(session.user.is_none());
    }

    #[test]
    fn test_explicit_id_kept() {
        let mut session = Session::default();
        let req = LoginRequest {
            id: Some("u-77".into()),
            email: Some("jane@farm.test".into()),
            ..request("Jane")
        };
        let user = login(&mut session, req, 0).unwrap();
        assert_eq!(user.id, "u-77");
        assert_eq!(user.email, "jane@farm.test");
    }

    #[test]
    fn test_update_progress_levels_and_unions() {
        let mut session = Session::default();
        login(&mut session, request("Jane"), 0).unwrap();
        update_progress(&mut session, 60, &["first_harvest".into()]).unwrap();
        let user = update_progress(&mut session, 60, &["first_harvest".into(), "comic_creator".into()]).unwrap();
        assert_eq!(user.experience, 120);
        assert_eq!(user.farm_level, 2);
        assert_eq!(user.achievements, vec!["first_harvest", "comic_creator"]);

        let user = update_progress(&mut session, 380, &[]).unwrap();
        assert_eq!(user.farm_level, 3);
    }

    #[test]
    fn test_update_without_login() {
        let mut session = Session::default();
        assert_eq!(update_progress(&mut session, 5, &[]).err(), Some(SessionError::NotLoggedIn));
        logout(&mut session);
        assert!(session.user.is_none());
    }

    #[test]
    fn test_user_ids_from_usernames() {
        assert_eq!(user_id_from_username("  Moonlight  Farmer! "), "moonlight-farmer");
        assert_eq!(user_id_from_username("???"), "guest");
    }
}
