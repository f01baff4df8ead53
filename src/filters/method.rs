//! Equalization method selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EqualizeError;

/// The three supported equalization techniques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Equalize R, G and B independently. May shift color balance.
    #[default]
    ChannelWiseRgb,
    /// Equalize the HSV value channel only.
    HsvValue,
    /// CLAHE on the Lab lightness channel.
    ClaheLab,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::ChannelWiseRgb, Method::HsvValue, Method::ClaheLab];

    /// Human-readable label shown next to the processed image.
    pub fn label(self) -> &'static str {
        match self {
            Method::ChannelWiseRgb => "RGB Channel-wise",
            Method::HsvValue => "HSV V-channel",
            Method::ClaheLab => "CLAHE (LAB)",
        }
    }

    /// File name offered when downloading a result,
    /// e.g. `equalized_clahe_(lab).jpg`.
    pub fn download_file_name(self) -> String {
        format!("equalized_{}.jpg", self.label().to_lowercase().replace(' ', "_"))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Method {
    type Err = EqualizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "rgb" | "channel_wise_rgb" | "rgb channel-wise" => Ok(Method::ChannelWiseRgb),
            "hsv" | "hsv_value" | "hsv v-channel" => Ok(Method::HsvValue),
            "clahe" | "clahe_lab" | "clahe (lab)" => Ok(Method::ClaheLab),
            _ => Err(EqualizeError::InvalidParameter(format!(
                "unknown equalization method '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Method::ChannelWiseRgb.label(), "RGB Channel-wise");
        assert_eq!(Method::HsvValue.label(), "HSV V-channel");
        assert_eq!(Method::ClaheLab.label(), "CLAHE (LAB)");
    }

    #[test]
    fn test_download_file_names() {
        assert_eq!(
            Method::ChannelWiseRgb.download_file_name(),
            "equalized_rgb_channel-wise.jpg"
        );
        assert_eq!(Method::HsvValue.download_file_name(), "equalized_hsv_v-channel.jpg");
        assert_eq!(Method::ClaheLab.download_file_name(), "equalized_clahe_(lab).jpg");
    }

    #[test]
    fn test_parse_short_and_label_forms() {
        for m in Method::ALL {
            assert_eq!(m.label().parse::<Method>().unwrap(), m);
        }
        assert_eq!("CLAHE".parse::<Method>().unwrap(), Method::ClaheLab);
        assert_eq!(" hsv ".parse::<Method>().unwrap(), Method::HsvValue);
        assert!("sepia".parse::<Method>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Method::HsvValue).unwrap();
        assert_eq!(json, "\"hsv_value\"");
        let m: Method = serde_json::from_str("\"clahe_lab\"").unwrap();
        assert_eq!(m, Method::ClaheLab);
    }
}
