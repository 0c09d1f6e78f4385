use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::llm::media::{detect_mime_type, encode_data_url};

pub const MOOD_SECTION_HEADER: &str = "1️⃣ 사진의 느낌, 분위기 묘사:";
pub const SURVEY_SECTION_HEADER: &str = "2️⃣ 설문조사 결과 성향 분석 요약:";
pub const MATCH_SECTION_HEADER: &str = "3️⃣ 이 사람과 어울릴 것 같은 사람의 페르소나 요약:";

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("reference image '{}' for {persona} was not found; place it next to the binary or set {env_var}", path.display())]
    MissingAsset {
        persona: &'static str,
        env_var: &'static str,
        path: PathBuf,
    },
    #[error("failed to read reference image '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reference image '{}' is empty", path.display())]
    Empty { path: PathBuf },
}

/// The two classification labels. Order of [`Persona::ALL`] is the order the
/// few-shot examples are presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Egen,
    Teto,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Egen, Persona::Teto];

    pub fn code(self) -> &'static str {
        match self {
            Persona::Egen => "EGEN",
            Persona::Teto => "TETO",
        }
    }

    pub fn korean_name(self) -> &'static str {
        match self {
            Persona::Egen => "에겐",
            Persona::Teto => "테토",
        }
    }

    fn asset_env_var(self) -> &'static str {
        match self {
            Persona::Egen => "EGEN_EXAMPLE_PATH",
            Persona::Teto => "TETO_EXAMPLE_PATH",
        }
    }

    /// 1-based position among the few-shot examples.
    pub fn example_number(self) -> usize {
        match self {
            Persona::Egen => 1,
            Persona::Teto => 2,
        }
    }

    pub fn canonical_output(self) -> &'static CanonicalOutput {
        match self {
            Persona::Egen => &EGEN_OUTPUT,
            Persona::Teto => &TETO_OUTPUT,
        }
    }

    pub fn few_shot_prompt(self) -> String {
        format!(
            "[예시 {number} - {name} 페르소나]\n이 예시 이미지와 가까운 사진이 들어오면, **'{name}'** 페르소나로 분류하고 아래 Assistant의 응답 형식처럼 결과를 출력해야 합니다.",
            number = self.example_number(),
            name = self.korean_name(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub header: &'static str,
    pub bullets: &'static [&'static str],
}

/// Fixed assistant answer for one persona, following the three-section
/// template the live answer must mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalOutput {
    pub persona: Persona,
    pub mood: Section,
    pub survey: Section,
    pub match_persona: Section,
}

impl CanonicalOutput {
    pub fn sections(&self) -> [&Section; 3] {
        [&self.mood, &self.survey, &self.match_persona]
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "**[분류된 페르소나: {} ({})]**\n",
            self.persona.korean_name(),
            self.persona.code()
        );
        for section in self.sections() {
            out.push('\n');
            out.push_str(section.header);
            out.push('\n');
            for bullet in section.bullets {
                out.push_str("* ");
                out.push_str(bullet);
                out.push('\n');
            }
        }
        out
    }
}

static EGEN_OUTPUT: CanonicalOutput = CanonicalOutput {
    persona: Persona::Egen,
    mood: Section {
        header: MOOD_SECTION_HEADER,
        bullets: &[
            "**분위기:** 따뜻하고 부드러운 햇살 아래에서 찍은 듯한 아늑하고 편안한 분위기가 느껴집니다. 전반적으로 채광이 좋고 미소가 자연스러워 친근감을 줍니다.",
            "**느낌:** 활동적이기보다는 사색적이고, 상대방을 배려할 줄 아는 차분한 느낌입니다.",
        ],
    },
    survey: Section {
        header: SURVEY_SECTION_HEADER,
        bullets: &[
            "사용자의 설문과 사진 분위기를 종합했을 때, 안정과 편안함을 추구하는 **내향적인 성향(집 선호)**이 강하며, 깊은 관계를 선호하는 타입으로 보입니다. (설문: 집에서 노는 걸 선호해)",
        ],
    },
    match_persona: Section {
        header: MATCH_SECTION_HEADER,
        bullets: &[
            "**유형:** 안정감을 주는 '테토' 페르소나와 상호 보완적인 관계가 될 수 있습니다. 에겐의 섬세한 감성을 이해해주고, 가끔은 활동적인 에너지를 불어넣어 줄 수 있는 사람.",
            "**특징:** 긍정적이고 개방적이며, 즉흥적인 데이트 코스에 언제든 즐겁게 동참할 수 있는 **'내향적인 탐색형(IP)'** 이 적합합니다.",
        ],
    },
};

static TETO_OUTPUT: CanonicalOutput = CanonicalOutput {
    persona: Persona::Teto,
    mood: Section {
        header: MOOD_SECTION_HEADER,
        bullets: &[
            "**분위기:** 야외 활동 중 활기차고 역동적인 에너지가 느껴집니다. 웃는 모습이 시원시원하고 생동감이 넘쳐 사교성이 좋아 보입니다.",
            "**느낌:** 자신감 있고 도전적이면서도, 유머 감각이 있어 주변 사람들에게 즐거움을 주는 쾌활한 느낌입니다.",
        ],
    },
    survey: Section {
        header: SURVEY_SECTION_HEADER,
        bullets: &[
            "사용자의 설문과 사진 분위기를 종합했을 때, 새로운 경험을 추구하고 사람들과의 만남에서 에너지를 얻는 **외향적인 성향(밖 선호)**이 강하며, 즉흥적이고 모험적인 탐색형(P) 기질이 돋보입니다. (설문: 밖에서 노는 게 좋아, 즉흥적으로 목적지를 선택하는 게 좋아)",
        ],
    },
    match_persona: Section {
        header: MATCH_SECTION_HEADER,
        bullets: &[
            "**유형:** 테토의 활동성을 지지하고 때로는 함께 일탈을 즐길 수 있는 '에겐' 페르소나와 흥미로운 관계가 될 수 있습니다.",
            "**특징:** 긍정적이고 개방적이며, 즉흥적인 데이트 코스에 언제든 즐겁게 동참할 수 있는 **'내향적인 탐색형(IP)'** 이 적합합니다.",
        ],
    },
};

#[derive(Debug, Clone)]
pub struct ReferenceExample {
    pub persona: Persona,
    pub image: Vec<u8>,
    pub mime_type: String,
}

impl ReferenceExample {
    pub fn new(persona: Persona, image: Vec<u8>) -> Self {
        let mime_type = detect_mime_type(&image).unwrap_or_else(|| "image/png".to_string());
        Self {
            persona,
            image,
            mime_type,
        }
    }

    pub fn canonical_output(&self) -> &'static CanonicalOutput {
        self.persona.canonical_output()
    }

    pub fn data_url(&self) -> String {
        encode_data_url(&self.mime_type, &self.image)
    }

    fn load(persona: Persona, path: &Path) -> Result<Self, ReferenceError> {
        if !path.exists() {
            return Err(ReferenceError::MissingAsset {
                persona: persona.code(),
                env_var: persona.asset_env_var(),
                path: path.to_path_buf(),
            });
        }
        let image = fs::read(path).map_err(|source| ReferenceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if image.is_empty() {
            return Err(ReferenceError::Empty {
                path: path.to_path_buf(),
            });
        }
        info!(
            "Loaded {} reference image from {} ({} bytes)",
            persona.code(),
            path.display(),
            image.len()
        );
        Ok(Self::new(persona, image))
    }
}

/// Both few-shot examples, always iterated EGEN first.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    egen: ReferenceExample,
    teto: ReferenceExample,
}

impl ReferenceSet {
    pub fn load(egen_path: &Path, teto_path: &Path) -> Result<Self, ReferenceError> {
        Ok(Self {
            egen: ReferenceExample::load(Persona::Egen, egen_path)?,
            teto: ReferenceExample::load(Persona::Teto, teto_path)?,
        })
    }

    #[cfg(test)]
    pub fn from_images(egen_image: Vec<u8>, teto_image: Vec<u8>) -> Self {
        Self {
            egen: ReferenceExample::new(Persona::Egen, egen_image),
            teto: ReferenceExample::new(Persona::Teto, teto_image),
        }
    }

    pub fn get(&self, persona: Persona) -> &ReferenceExample {
        match persona {
            Persona::Egen => &self.egen,
            Persona::Teto => &self.teto,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceExample> {
        Persona::ALL.into_iter().map(move |persona| self.get(persona))
    }
}
