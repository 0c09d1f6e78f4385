use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyPreference {
    Outdoor,
    Indoor,
}

impl EnergyPreference {
    pub const ALL: [EnergyPreference; 2] = [EnergyPreference::Outdoor, EnergyPreference::Indoor];
    pub const QUESTION: &'static str = "Q1. 주로 에너지를 얻는 곳은?";

    pub fn form_value(self) -> &'static str {
        match self {
            EnergyPreference::Outdoor => "outdoor",
            EnergyPreference::Indoor => "indoor",
        }
    }

    /// Answer wording shown in the form and quoted in the prompt.
    pub fn answer_text(self) -> &'static str {
        match self {
            EnergyPreference::Outdoor => "나는 밖에서 노는 게 좋아.",
            EnergyPreference::Indoor => "나는 집에서 노는 걸 선호해.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Spontaneous,
    Planned,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 2] = [TravelStyle::Spontaneous, TravelStyle::Planned];
    pub const QUESTION: &'static str = "Q2. 여행 스타일은?";

    pub fn form_value(self) -> &'static str {
        match self {
            TravelStyle::Spontaneous => "spontaneous",
            TravelStyle::Planned => "planned",
        }
    }

    pub fn answer_text(self) -> &'static str {
        match self {
            TravelStyle::Spontaneous => "나는 여행에서 즉흥적으로 목적지를 선택하는 게 좋아.",
            TravelStyle::Planned => "여행은 무조건 계획대로!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyResponse {
    pub energy: EnergyPreference,
    pub travel: TravelStyle,
}

/// Advisory only: quoted in the prompt, never gates the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consent {
    Granted,
    Declined,
}

impl Consent {
    pub const ALL: [Consent; 2] = [Consent::Granted, Consent::Declined];
    pub const QUESTION: &'static str = "Q. 내 데이터를 가져오시겠습니까?";

    pub fn form_value(self) -> &'static str {
        match self {
            Consent::Granted => "granted",
            Consent::Declined => "declined",
        }
    }

    pub fn answer_text(self) -> &'static str {
        match self {
            Consent::Granted => "네",
            Consent::Declined => "아니오",
        }
    }
}
