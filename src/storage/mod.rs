use crate::models::AccountInfo;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "ainote_token";
pub(crate) const USER_KEY: &str = "ainote_user";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn save_user_to_storage(user: &AccountInfo) {
    save_json_to_storage(USER_KEY, user);
}

pub(crate) fn load_user_from_storage() -> Option<AccountInfo> {
    load_json_from_storage::<AccountInfo>(USER_KEY)
}
