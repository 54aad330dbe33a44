use std::time::Duration;

use async_trait::async_trait;

use crate::{
    core::error::AppError,
    model::{essay_idea::NewEssayIdea, lab::Lab, professor::Professor},
    profile::ProfileData,
};

use super::{
    validate_essay_content_type, EssayDocument, EssayFeedback, EssayGrader, EssayIdeaGenerator,
    FeedbackScore, ResearchEmailGenerator,
};

/// Canned answers, optionally after a fixed delay.
#[derive(Clone, Debug, Default)]
pub struct FixtureGenerator {
    delay: Duration,
}

impl FixtureGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn field_or<'a>(profile: Option<&'a ProfileData>, pick: fn(&ProfileData) -> &str, fallback: &'a str) -> &'a str {
    match profile.map(pick) {
        Some(val) if !val.trim().is_empty() => val,
        _ => fallback,
    }
}

fn key_points(points: &[&str]) -> Vec<String> {
    points.iter().map(|x| x.to_string()).collect()
}

#[async_trait]
impl ResearchEmailGenerator for FixtureGenerator {
    async fn draft_email(
        &self,
        lab: &Lab,
        professor: &Professor,
        profile: Option<&ProfileData>,
    ) -> Result<String, AppError> {
        self.wait().await;
        let name = field_or(profile, |p| &p.name, "[Your Name]");
        let school = field_or(profile, |p| &p.school, "[Your University]");
        let major = field_or(profile, |p| &p.major, "[Your Major]");
        Ok(format!(
            "Subject: Undergraduate Research Opportunity Inquiry - {lab_name}\n\n\
Dear {professor},\n\n\
I hope this email finds you well. My name is {name}, and I am a [Your Year] student at {school} majoring in {major}.\n\n\
I am writing to express my interest in research opportunities at the {lab_name}. I was particularly drawn to your work in {area}, especially [mention specific research or publication that interests you].\n\n\
{description} This aligns perfectly with my academic interests and career goals in [relevant field].\n\n\
During my studies, I have completed coursework in [relevant courses] and have developed skills in [relevant skills]. I have also [mention any relevant projects, experience, or achievements].\n\n\
I would greatly appreciate the opportunity to discuss potential research positions in your lab, whether for course credit, as a volunteer, or as a paid position. I am available to meet at your convenience to further discuss how my background and interests might contribute to your research.\n\n\
Thank you for considering my inquiry. I have attached my resume for your review, and I look forward to the possibility of working with you.\n\n\
Sincerely,\n{name}\n[Your Contact Information]",
            lab_name = lab.name,
            professor = professor.name,
            area = lab.research_area,
            description = lab.description,
        ))
    }
}

#[async_trait]
impl EssayIdeaGenerator for FixtureGenerator {
    async fn generate_ideas(
        &self,
        prompt: &str,
        profile: Option<&ProfileData>,
    ) -> Result<Vec<NewEssayIdea>, AppError> {
        if prompt.trim().is_empty() {
            return Err(AppError::InvalidInput("essay prompt is empty".to_string()));
        }
        self.wait().await;

        let first_project = profile.and_then(|p| {
            (!p.projects.trim().is_empty())
                .then(|| p.first_project_line().unwrap_or("your documented projects"))
        });
        let major = profile.map(|p| p.major.trim()).filter(|x| !x.is_empty());
        let minor = profile.map(|p| p.minor.trim()).filter(|x| !x.is_empty());
        let gpa = profile.map(|p| p.gpa.trim()).filter(|x| !x.is_empty());
        let badges = profile.map(|p| p.certification_badges()).unwrap_or_default();

        let research_connection = match first_project {
            Some(project) => format!(
                "Based on your projects: \"{}\", you could explore how this work opened new intellectual pathways.",
                project
            ),
            None => "Connect this to any research experience, class project, or independent study you've undertaken.".to_string(),
        };
        let bridging_connection = match (major, minor) {
            (Some(major), Some(minor)) => format!(
                "Your combination of {} and {} creates a unique interdisciplinary perspective.",
                major, minor
            ),
            (Some(major), None) => format!(
                "Your focus in {} combined with your other interests creates a unique perspective.",
                major
            ),
            _ => "Consider how your academic interests combine with your personal passions or background.".to_string(),
        };
        let challenge_connection = match gpa {
            Some(gpa) => format!(
                "Consider academic challenges you've faced while maintaining your {} GPA, or personal obstacles that tested your determination.",
                gpa
            ),
            None => "Think about academic, personal, or extracurricular challenges that pushed you to grow.".to_string(),
        };
        let innovation_connection = match first_project {
            Some(project) => format!(
                "Draw from your project experience: \"{}\" or similar innovative work.",
                project
            ),
            None => "Consider any time you've created something new, improved a process, or solved a problem creatively.".to_string(),
        };
        let learning_connection = if badges.is_empty() {
            "Consider any skills you've taught yourself, online courses you've taken, or independent projects you've pursued.".to_string()
        } else {
            format!(
                "Your certifications in {} show your commitment to learning beyond formal requirements.",
                badges.join(", ")
            )
        };

        Ok(vec![
            NewEssayIdea {
                title: "The Research That Changed My Perspective".to_string(),
                description: "Write about a specific research project or academic experience that fundamentally shifted your worldview or career aspirations.".to_string(),
                personal_connection: research_connection,
                key_points: vec![
                    "Describe the initial hypothesis or question that intrigued you".to_string(),
                    "Detail the moment of discovery or realization".to_string(),
                    "Explain how this experience influenced your academic/career goals".to_string(),
                    format!("Connect to your future aspirations in {}", major.unwrap_or("your field")),
                ],
                approach: "Use a narrative structure with a clear before/after transformation. Start with your initial understanding, build tension through the research process, and conclude with your evolved perspective.".to_string(),
            },
            NewEssayIdea {
                title: "Bridging Two Worlds".to_string(),
                description: "Explore how your unique combination of interests creates a distinctive perspective that you'll bring to college.".to_string(),
                personal_connection: bridging_connection,
                key_points: key_points(&[
                    "Identify the two 'worlds' or areas of interest you're bridging",
                    "Provide specific examples of how you've already combined these interests",
                    "Explain the value of this interdisciplinary approach",
                    "Describe how you'll continue this integration in college",
                ]),
                approach: "Use concrete examples and avoid abstract language. Show, don't tell, how your unique combination of interests has led to innovative thinking or problem-solving.".to_string(),
            },
            NewEssayIdea {
                title: "The Challenge That Defined My Growth".to_string(),
                description: "Reflect on a significant obstacle you've overcome and how it shaped your character and resilience.".to_string(),
                personal_connection: challenge_connection,
                key_points: key_points(&[
                    "Set the scene: what was the challenge and why was it significant?",
                    "Detail your response: what actions did you take?",
                    "Reflect on growth: what did you learn about yourself?",
                    "Connect to future: how will this resilience serve you in college?",
                ]),
                approach: "Focus on your internal journey and growth rather than just the external challenge. Admissions officers want to see self-reflection and maturity.".to_string(),
            },
            NewEssayIdea {
                title: "Innovation in Action".to_string(),
                description: "Showcase a time when you identified a problem and created a solution, demonstrating your initiative and creativity.".to_string(),
                personal_connection: innovation_connection,
                key_points: key_points(&[
                    "Identify the problem: what gap or need did you notice?",
                    "Describe your solution: what did you create or implement?",
                    "Explain your process: how did you develop and refine your idea?",
                    "Discuss impact: what changed as a result of your innovation?",
                ]),
                approach: "Use specific details and metrics where possible. Show your problem-solving process and don't be afraid to mention failures or iterations that led to success.".to_string(),
            },
            NewEssayIdea {
                title: "Learning Beyond the Classroom".to_string(),
                description: "Explore how your self-directed learning or extracurricular pursuits have shaped your intellectual curiosity.".to_string(),
                personal_connection: learning_connection,
                key_points: key_points(&[
                    "Describe what motivated you to learn independently",
                    "Detail the learning process and any obstacles you overcame",
                    "Explain how this knowledge has been applied or will be useful",
                    "Connect to your academic goals and how you'll continue this self-directed learning in college",
                ]),
                approach: "Emphasize your intrinsic motivation and curiosity. Show how you take ownership of your education and aren't just a passive recipient of knowledge.".to_string(),
            },
        ])
    }
}

#[async_trait]
impl EssayGrader for FixtureGenerator {
    async fn grade(&self, essay: &EssayDocument) -> Result<EssayFeedback, AppError> {
        validate_essay_content_type(&essay.content_type)?;
        if essay.bytes.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "essay '{}' is empty",
                essay.file_name
            )));
        }
        self.wait().await;

        let score = |category: &str, score: u8, description: &str| FeedbackScore {
            category: category.to_string(),
            score,
            description: description.to_string(),
        };
        Ok(EssayFeedback {
            scores: vec![
                score("Structure", 8, "Your essay has a clear introduction, body, and conclusion. Consider strengthening transitions between paragraphs."),
                score("Clarity", 7, "Your ideas are generally well-expressed, but some sentences could be more concise."),
                score("Style", 9, "Excellent use of vocabulary and varied sentence structure. Your voice comes through clearly."),
                score("Emotional Impact", 6, "The essay could benefit from more personal anecdotes to create emotional connection."),
            ],
            suggestions: key_points(&[
                "Consider adding a more compelling hook in your introduction.",
                "Paragraph 3 could be strengthened with a specific example.",
                "The conclusion would benefit from connecting back to your opening theme.",
                "Try varying sentence length more to create rhythm in your writing.",
                "Add more sensory details when describing your experiences.",
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use uuid::Uuid;

    use super::*;

    fn lab() -> Lab {
        Lab {
            id: Uuid::now_v7(),
            school: "gt".to_string(),
            name: "Machine Learning Lab".to_string(),
            research_area: "Artificial Intelligence".to_string(),
            description: "Focused on developing novel machine learning algorithms.".to_string(),
            created_at: Local::now().fixed_offset(),
        }
    }

    fn professor(lab_id: Uuid) -> Professor {
        Professor {
            id: Uuid::now_v7(),
            lab_id,
            name: "Dr. Jane Smith".to_string(),
            email: "jsmith@gatech.edu".to_string(),
            title: "Associate Professor".to_string(),
        }
    }

    #[tokio::test]
    async fn test_draft_email_without_profile_keeps_placeholders() {
        let lab = lab();
        let email = FixtureGenerator::default()
            .draft_email(&lab, &professor(lab.id), None)
            .await
            .unwrap();
        assert!(email.starts_with(
            "Subject: Undergraduate Research Opportunity Inquiry - Machine Learning Lab"
        ));
        assert!(email.contains("Dear Dr. Jane Smith,"));
        assert!(email.contains("My name is [Your Name]"));
        assert!(email.contains("your work in Artificial Intelligence"));
    }

    #[tokio::test]
    async fn test_draft_email_uses_profile() {
        let lab = lab();
        let profile = ProfileData {
            name: "Alex Kim".to_string(),
            school: "Georgia Tech".to_string(),
            major: "".to_string(),
            ..Default::default()
        };
        let email = FixtureGenerator::default()
            .draft_email(&lab, &professor(lab.id), Some(&profile))
            .await
            .unwrap();
        assert!(email.contains("My name is Alex Kim"));
        assert!(email.contains("student at Georgia Tech majoring in [Your Major]"));
        assert!(email.ends_with("Sincerely,\nAlex Kim\n[Your Contact Information]"));
    }

    #[tokio::test]
    async fn test_generate_ideas_rejects_blank_prompt() {
        let res = FixtureGenerator::default().generate_ideas("   ", None).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_generate_ideas_personalized() {
        let profile = ProfileData {
            major: "Computer Science".to_string(),
            minor: "Mathematics".to_string(),
            gpa: "3.8".to_string(),
            certifications: vec!["AWS Certified Developer".to_string(), " ".to_string()],
            projects: "Built a rover\nWrote a compiler".to_string(),
            ..Default::default()
        };
        let ideas = FixtureGenerator::default()
            .generate_ideas("Why this college?", Some(&profile))
            .await
            .unwrap();
        assert_eq!(ideas.len(), 5);
        assert!(ideas[0].personal_connection.contains("\"Built a rover\""));
        assert_eq!(
            ideas[0].key_points[3],
            "Connect to your future aspirations in Computer Science"
        );
        assert!(ideas[1]
            .personal_connection
            .contains("Computer Science and Mathematics"));
        assert!(ideas[2].personal_connection.contains("3.8 GPA"));
        assert_eq!(
            ideas[4].personal_connection,
            "Your certifications in AWS Certified Developer show your commitment to learning beyond formal requirements."
        );
    }

    #[tokio::test]
    async fn test_generate_ideas_without_profile() {
        let ideas = FixtureGenerator::default()
            .generate_ideas("Describe a challenge", None)
            .await
            .unwrap();
        assert_eq!(
            ideas[0].key_points[3],
            "Connect to your future aspirations in your field"
        );
        assert!(ideas[4].personal_connection.starts_with("Consider any skills"));
    }

    #[tokio::test]
    async fn test_grade_fixed_feedback() {
        let essay = EssayDocument {
            file_name: "essay.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"My essay".to_vec(),
        };
        let feedback = FixtureGenerator::default().grade(&essay).await.unwrap();
        let scores: Vec<(&str, u8)> = feedback
            .scores
            .iter()
            .map(|x| (x.category.as_str(), x.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("Structure", 8),
                ("Clarity", 7),
                ("Style", 9),
                ("Emotional Impact", 6)
            ]
        );
        assert_eq!(feedback.suggestions.len(), 5);
    }

    #[tokio::test]
    async fn test_grade_rejects_unsupported_type() {
        let essay = EssayDocument {
            file_name: "essay.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let res = FixtureGenerator::default().grade(&essay).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
    }
}
