//! Keyword-weighted cluster classification.
//!
//! Every cluster carries a static keyword list and a display color. A record
//! is scored against every list; title hits weigh more than topic hits,
//! which weigh more than hits anywhere else in the record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::RawContentRecord;

const TITLE_WEIGHT: u32 = 3;
const TOPIC_WEIGHT: u32 = 2;
const TEXT_WEIGHT: u32 = 1;

/// The fixed set of clusters a content node can belong to.
///
/// Declaration order is significant: it breaks classification ties and
/// orders equally sized legend entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ClusterLabel {
	#[serde(rename = "JavaScript")]
	JavaScript,
	#[serde(rename = "Python")]
	Python,
	#[serde(rename = "AI/ML")]
	AiMl,
	#[serde(rename = "Web Development")]
	WebDevelopment,
	#[serde(rename = "Programming")]
	Programming,
	#[serde(rename = "Database")]
	Database,
	#[serde(rename = "Mobile Development")]
	MobileDevelopment,
	#[serde(rename = "DevOps")]
	DevOps,
	#[serde(rename = "Data Science")]
	DataScience,
	#[serde(rename = "Design")]
	Design,
	#[serde(rename = "Mathematics")]
	Mathematics,
	#[serde(rename = "Education")]
	Education,
	#[serde(rename = "Gaming")]
	Gaming,
	#[serde(rename = "Security")]
	Security,
	#[serde(rename = "General")]
	General,
}

struct ClusterInfo {
	name: &'static str,
	color: &'static str,
	keywords: &'static [&'static str],
}

impl ClusterLabel {
	/// All labels in declaration order.
	pub const ALL: [Self; 15] = [
		Self::JavaScript,
		Self::Python,
		Self::AiMl,
		Self::WebDevelopment,
		Self::Programming,
		Self::Database,
		Self::MobileDevelopment,
		Self::DevOps,
		Self::DataScience,
		Self::Design,
		Self::Mathematics,
		Self::Education,
		Self::Gaming,
		Self::Security,
		Self::General,
	];

	fn info(self) -> &'static ClusterInfo {
		match self {
			Self::JavaScript => &ClusterInfo {
				name: "JavaScript",
				color: "#f7df1e",
				keywords: &[
					"javascript", "typescript", "react", "node.js", "nodejs", "npm", "vue",
					"angular", "svelte", "next.js", "ecmascript",
				],
			},
			Self::Python => &ClusterInfo {
				name: "Python",
				color: "#3776ab",
				keywords: &[
					"python", "django", "flask", "fastapi", "pandas", "numpy", "pip ", "pytest",
					"jupyter",
				],
			},
			Self::AiMl => &ClusterInfo {
				name: "AI/ML",
				color: "#ff6b6b",
				keywords: &[
					"machine learning",
					"artificial intelligence",
					"deep learning",
					"neural network",
					"llm",
					"gpt",
					"transformer",
					"openai",
					"pytorch",
					"tensorflow",
					"embedding",
				],
			},
			Self::WebDevelopment => &ClusterInfo {
				name: "Web Development",
				color: "#4ecdc4",
				keywords: &[
					"html", "css", "frontend", "backend", "web development", "http", "browser",
					"tailwind", "web app",
				],
			},
			Self::Programming => &ClusterInfo {
				name: "Programming",
				color: "#45b7d1",
				keywords: &[
					"programming", "rust", "golang", "java", "c++", "algorithm", "compiler",
					"software", "coding", "github",
				],
			},
			Self::Database => &ClusterInfo {
				name: "Database",
				color: "#96ceb4",
				keywords: &[
					"database", "sql", "postgres", "mysql", "mongodb", "redis", "sqlite",
					"supabase", "query",
				],
			},
			Self::MobileDevelopment => &ClusterInfo {
				name: "Mobile Development",
				color: "#feca57",
				keywords: &[
					"android", "ios", "swift", "kotlin", "flutter", "react native", "mobile app",
				],
			},
			Self::DevOps => &ClusterInfo {
				name: "DevOps",
				color: "#ff9ff3",
				keywords: &[
					"devops", "docker", "kubernetes", "ci/cd", "terraform", "deployment", "aws",
					"cloud", "linux",
				],
			},
			Self::DataScience => &ClusterInfo {
				name: "Data Science",
				color: "#54a0ff",
				keywords: &[
					"data science", "analytics", "visualization", "statistics", "dataset",
					"data analysis", "kaggle",
				],
			},
			Self::Design => &ClusterInfo {
				name: "Design",
				color: "#5f27cd",
				keywords: &[
					"design", "figma", "typography", "ux", "user interface", "illustration",
				],
			},
			Self::Mathematics => &ClusterInfo {
				name: "Mathematics",
				color: "#00d2d3",
				keywords: &[
					"math", "algebra", "calculus", "geometry", "probability", "theorem",
				],
			},
			Self::Education => &ClusterInfo {
				name: "Education",
				color: "#ff9f43",
				keywords: &[
					"tutorial", "course", "learn", "guide", "lesson", "documentation", "university",
				],
			},
			Self::Gaming => &ClusterInfo {
				name: "Gaming",
				color: "#10ac84",
				keywords: &["game", "gaming", "unity", "unreal", "steam", "esports"],
			},
			Self::Security => &ClusterInfo {
				name: "Security",
				color: "#ee5a24",
				keywords: &[
					"security", "encryption", "vulnerability", "cve", "authentication", "malware",
					"privacy",
				],
			},
			Self::General => &ClusterInfo {
				name: "General",
				color: "#95a5a6",
				keywords: &[],
			},
		}
	}

	/// Human readable name, also used on the wire.
	pub fn name(self) -> &'static str {
		self.info().name
	}

	/// CSS color used for nodes and legend swatches.
	pub fn color(self) -> &'static str {
		self.info().color
	}

	/// Lowercase keywords matched against records.
	pub fn keywords(self) -> &'static [&'static str] {
		self.info().keywords
	}

	/// Position in [`ClusterLabel::ALL`].
	pub fn ordinal(self) -> usize {
		self as usize
	}
}

impl fmt::Display for ClusterLabel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Lowercased views of the record fields the classifier looks at.
///
/// Every field and every topic is matched on its own, so a phrase keyword
/// never matches across the boundary of two topics.
struct ScoringText {
	title: String,
	topics: Vec<String>,
	rest: Vec<String>,
}

impl ScoringText {
	fn of(record: &RawContentRecord) -> Self {
		let lower = |s: Option<&str>| s.unwrap_or_default().to_lowercase();
		Self {
			title: lower(record.title.as_deref()),
			topics: record.topics.iter().map(|t| t.to_lowercase()).collect(),
			rest: vec![
				lower(record.content_type.as_deref()),
				lower(record.summary.as_deref()),
			],
		}
	}

	fn in_topics(&self, kw: &str) -> bool {
		self.topics.iter().any(|t| t.contains(kw))
	}

	fn anywhere(&self, kw: &str) -> bool {
		self.title.contains(kw) || self.in_topics(kw) || self.rest.iter().any(|f| f.contains(kw))
	}

	fn score(&self, keywords: &[&str]) -> u32 {
		keywords
			.iter()
			.map(|&kw| {
				let mut s = 0;
				if self.title.contains(kw) {
					s += TITLE_WEIGHT;
				}
				if self.in_topics(kw) {
					s += TOPIC_WEIGHT;
				}
				if self.anywhere(kw) {
					s += TEXT_WEIGHT;
				}
				s
			})
			.sum()
	}
}

/// Score of `record` against every cluster, in declaration order.
pub fn score(record: &RawContentRecord) -> [(ClusterLabel, u32); 15] {
	let text = ScoringText::of(record);
	ClusterLabel::ALL.map(|label| (label, text.score(label.keywords())))
}

/// Assigns `record` to the cluster with the strictly highest score.
///
/// Ties go to the cluster declared first; a record that matches nothing is
/// [`ClusterLabel::General`].
pub fn classify(record: &RawContentRecord) -> ClusterLabel {
	let mut best = (ClusterLabel::General, 0);
	for (label, s) in score(record) {
		if s > best.1 {
			best = (label, s);
		}
	}
	best.0
}
