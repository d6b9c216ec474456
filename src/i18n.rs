// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! English and Spanish user interface strings.

use serde::{Deserialize, Serialize};

use crate::model::{FeedOrder, FrontendConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// Picks the stored preference, else the `LANG` locale, else English.
    pub(crate) fn detect(preference: Option<Language>, locale: Option<&str>) -> Self {
        preference.unwrap_or_else(|| match locale {
            Some(locale) if locale.to_ascii_lowercase().starts_with("es") => Language::Es,
            _ => Language::En,
        })
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    pub(crate) fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub(crate) fn toggled(self) -> Self {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }

    pub(crate) fn text(self, text: Text) -> &'static str {
        match self {
            Language::En => text.english(),
            Language::Es => text.spanish(),
        }
    }

    pub(crate) fn order_label(self, order: FeedOrder) -> &'static str {
        match order {
            FeedOrder::Newest => self.text(Text::Newest),
            FeedOrder::Random => self.text(Text::Random),
        }
    }

    /// The banner for this language, falling back to English and then to
    /// the legacy single-language field. Blank messages count as absent.
    pub(crate) fn banner(self, config: &FrontendConfig) -> Option<&str> {
        let localized = match self {
            Language::En => config.banner_message_en.as_deref(),
            Language::Es => config.banner_message_es.as_deref(),
        };

        [localized, config.banner_message_en.as_deref(), config.banner_message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Text {
    LiveFeed,
    Welcome,
    Waiting,
    Loading,
    UpNext,
    YourUploads,
    NoUploads,
    Guest,
    Photos,
    Videos,
    Order,
    Newest,
    Random,
    Uploading,
    UploadSuccess,
    UploadFailed,
    FileTooLarge,
    VideoTooLong,
    UnsupportedFile,
    ActionFailed,
    ActionDone,
    Deleted,
    NameSaved,
    NameRequired,
    LoggedOut,
    PurgeConfirm,
    NextStep,
    Help,
}

impl Text {
    fn english(self) -> &'static str {
        match self {
            Text::LiveFeed => "LIVE FEED",
            Text::Welcome => "Welcome, {name}!",
            Text::Waiting => "Waiting for photos...",
            Text::Loading => "Loading...",
            Text::UpNext => "Up next",
            Text::YourUploads => "Your Uploads",
            Text::NoUploads => "Nothing uploaded yet",
            Text::Guest => "Guest",
            Text::Photos => "photos",
            Text::Videos => "videos",
            Text::Order => "order",
            Text::Newest => "newest",
            Text::Random => "random",
            Text::Uploading => "Uploading",
            Text::UploadSuccess => "Upload Successful!",
            Text::UploadFailed => "Upload failed",
            Text::FileTooLarge => "File too large!",
            Text::VideoTooLong => "Video too long!",
            Text::UnsupportedFile => "Unsupported file type",
            Text::ActionFailed => "Action failed",
            Text::ActionDone => "Done",
            Text::Deleted => "Deleted",
            Text::NameSaved => "Name saved",
            Text::NameRequired => "Set your name first with :name <first> <last>",
            Text::LoggedOut => "Logged out",
            Text::PurgeConfirm => "Purge needs the PIN followed by 'confirm'",
            Text::NextStep => "next step",
            Text::Help => "q quit  n next  o order  l lang  t theme  u uploads  : command",
        }
    }

    fn spanish(self) -> &'static str {
        match self {
            Text::LiveFeed => "VER EN VIVO",
            Text::Welcome => "¡Bienvenido, {name}!",
            Text::Waiting => "Esperando fotos...",
            Text::Loading => "Cargando...",
            Text::UpNext => "A continuación",
            Text::YourUploads => "Tus Subidas",
            Text::NoUploads => "Aún no has subido nada",
            Text::Guest => "Invitado",
            Text::Photos => "fotos",
            Text::Videos => "videos",
            Text::Order => "orden",
            Text::Newest => "recientes",
            Text::Random => "aleatorio",
            Text::Uploading => "Subiendo",
            Text::UploadSuccess => "¡Subida Exitosa!",
            Text::UploadFailed => "La subida falló",
            Text::FileTooLarge => "¡Archivo demasiado grande!",
            Text::VideoTooLong => "¡Video demasiado largo!",
            Text::UnsupportedFile => "Tipo de archivo no soportado",
            Text::ActionFailed => "Acción fallida",
            Text::ActionDone => "Hecho",
            Text::Deleted => "Eliminado",
            Text::NameSaved => "Nombre guardado",
            Text::NameRequired => "Primero indica tu nombre con :name <nombre> <apellido>",
            Text::LoggedOut => "Sesión cerrada",
            Text::PurgeConfirm => "La purga necesita el PIN seguido de 'confirm'",
            Text::NextStep => "siguiente paso",
            Text::Help => "q salir  n siguiente  o orden  l idioma  t tema  u subidas  : comando",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(en: Option<&str>, es: Option<&str>, legacy: Option<&str>) -> FrontendConfig {
        FrontendConfig {
            banner_message_en: en.map(String::from),
            banner_message_es: es.map(String::from),
            banner_message: legacy.map(String::from),
            ..FrontendConfig::default()
        }
    }

    #[test]
    fn banner_prefers_current_language() {
        let config = config(Some("Welcome"), Some("Bienvenidos"), Some("Old"));

        assert_eq!(Language::Es.banner(&config), Some("Bienvenidos"));
        assert_eq!(Language::En.banner(&config), Some("Welcome"));
    }

    #[test]
    fn banner_falls_back_to_english_then_legacy() {
        assert_eq!(Language::Es.banner(&config(Some("Welcome"), None, Some("Old"))), Some("Welcome"));
        assert_eq!(Language::Es.banner(&config(None, Some("  "), Some("Old"))), Some("Old"));
        assert_eq!(Language::En.banner(&config(None, None, None)), None);
    }

    #[test]
    fn detect_uses_preference_then_locale() {
        assert_eq!(Language::detect(Some(Language::En), Some("es_ES.UTF-8")), Language::En);
        assert_eq!(Language::detect(None, Some("es_MX.UTF-8")), Language::Es);
        assert_eq!(Language::detect(None, Some("C")), Language::En);
        assert_eq!(Language::detect(None, None), Language::En);
    }

    #[test]
    fn codes_parse_back_to_their_language() {
        assert_eq!(Language::En.code(), "en");
        assert_eq!(Language::parse(Language::Es.code()), Some(Language::Es));
    }

    #[test]
    fn texts_are_translated() {
        assert_eq!(Language::En.text(Text::LiveFeed), "LIVE FEED");
        assert_eq!(Language::Es.text(Text::LiveFeed), "VER EN VIVO");
        assert_eq!(Language::En.toggled(), Language::Es);
    }

    #[test]
    fn order_labels_follow_language() {
        assert_eq!(Language::En.order_label(FeedOrder::Random), "random");
        assert_eq!(Language::Es.order_label(FeedOrder::Newest), "recientes");
    }
}
