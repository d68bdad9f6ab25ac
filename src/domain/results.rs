//! 结果统计
//!
//! 纯函数：输入问卷与答卷，输出每个选项的选择次数、百分比、平均选择数以及最受欢迎选项。

use serde::Serialize;

use super::response::Response;
use super::survey::{Question, SelectionMode, Survey};

/// 单个选项的统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStat {
    pub id: String,
    pub question_id: String,
    pub text_en: String,
    pub text_sv: String,
    pub image: String,
    pub count: usize,
    /// 占总答卷数的百分比，保留一位小数
    pub percentage: f64,
}

/// 单个问题的统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStats {
    pub question_id: String,
    pub text_en: String,
    pub text_sv: String,
    pub selection_mode: SelectionMode,
    /// 在该问题下至少选了一项的答卷数
    pub answered: usize,
    pub item_stats: Vec<ItemStat>,
    pub most_selected: Vec<ItemStat>,
}

/// 问卷整体统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyStats {
    pub total_responses: usize,
    pub avg_selections: f64,
    pub item_stats: Vec<ItemStat>,
    pub most_selected: Vec<ItemStat>,
    pub questions: Vec<QuestionStats>,
}

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 百分比：count / total * 100，保留一位小数；total 为 0 时为 0
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

/// 计算问卷统计
///
/// `responses` 只应包含该问卷的答卷。
pub fn compute(survey: &Survey, responses: &[Response]) -> SurveyStats {
    let total = responses.len();

    let questions: Vec<QuestionStats> = survey
        .questions
        .iter()
        .map(|q| question_stats(q, responses, total))
        .collect();

    let mut item_stats: Vec<ItemStat> = questions
        .iter()
        .flat_map(|q| q.item_stats.iter().cloned())
        .collect();
    // 稳定排序：同票数保持问卷中的顺序
    item_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let selections: usize = responses.iter().map(Response::selection_count).sum();
    let avg_selections = if total == 0 {
        0.0
    } else {
        round1(selections as f64 / total as f64)
    };

    SurveyStats {
        total_responses: total,
        avg_selections,
        most_selected: most_selected(&item_stats),
        item_stats,
        questions,
    }
}

fn question_stats(question: &Question, responses: &[Response], total: usize) -> QuestionStats {
    let mut item_stats: Vec<ItemStat> = question
        .items
        .iter()
        .map(|item| {
            let count = responses
                .iter()
                .filter(|r| r.selects(&question.id, &item.id))
                .count();
            ItemStat {
                id: item.id.clone(),
                question_id: question.id.clone(),
                text_en: item.text_en.clone(),
                text_sv: item.text_sv.clone(),
                image: item.image.clone().unwrap_or_default(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();
    item_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let answered = responses
        .iter()
        .filter(|r| question.items.iter().any(|item| r.selects(&question.id, &item.id)))
        .count();

    QuestionStats {
        question_id: question.id.clone(),
        text_en: question.text_en.clone(),
        text_sv: question.text_sv.clone(),
        selection_mode: question.selection_mode,
        answered,
        most_selected: most_selected(&item_stats),
        item_stats,
    }
}

/// 所有并列最高票的选项；最高票为 0 时为空
fn most_selected(stats: &[ItemStat]) -> Vec<ItemStat> {
    let max = stats.iter().map(|s| s.count).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    stats.iter().filter(|s| s.count == max).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::response::{Answers, QuestionAnswer};
    use crate::domain::survey::{Item, SurveyContent, SurveyId};
    use chrono::Utc;

    fn survey() -> Survey {
        Survey::new(
            SurveyId::from("1"),
            SurveyContent {
                title_en: "Food".into(),
                questions: vec![
                    Question {
                        id: "q1".into(),
                        text_en: "Main".into(),
                        text_sv: "Huvudrätt".into(),
                        selection_mode: SelectionMode::Single,
                        items: vec![
                            Item::new("a", "Fish", "Fisk"),
                            Item::new("b", "Meat", "Kött"),
                            Item::new("c", "Veg", "Veg"),
                        ],
                    },
                    Question {
                        id: "q2".into(),
                        text_en: "Drinks".into(),
                        text_sv: "Dryck".into(),
                        selection_mode: SelectionMode::Multiple,
                        items: vec![Item::new("a", "Water", "Vatten"), Item::new("d", "Milk", "Mjölk")],
                    },
                ],
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn answer(q1: &[&str], q2: &[&str]) -> Response {
        let group = |id: &str, items: &[&str]| QuestionAnswer {
            question_id: id.to_string(),
            selected_items: items.iter().map(|s| s.to_string()).collect(),
        };
        Response::new(
            SurveyId::from("1"),
            Answers::Questions { responses: vec![group("q1", q1), group("q2", q2)] },
            Utc::now(),
        )
    }

    fn find<'a>(stats: &'a [ItemStat], q: &str, id: &str) -> &'a ItemStat {
        stats.iter().find(|s| s.question_id == q && s.id == id).unwrap()
    }

    #[test]
    fn test_empty_results() {
        let stats = compute(&survey(), &[]);
        assert_eq!(stats.total_responses, 0);
        assert_eq!(stats.avg_selections, 0.0);
        assert!(stats.most_selected.is_empty());
        assert_eq!(stats.item_stats.len(), 5);
        assert!(stats.item_stats.iter().all(|s| s.count == 0 && s.percentage == 0.0));
    }

    #[test]
    fn test_counts_are_scoped_per_question() {
        let responses = vec![answer(&["a"], &["d"]), answer(&["b"], &["a", "d"]), answer(&["a"], &[])];
        let stats = compute(&survey(), &responses);

        assert_eq!(stats.total_responses, 3);
        assert_eq!(find(&stats.item_stats, "q1", "a").count, 2);
        assert_eq!(find(&stats.item_stats, "q2", "a").count, 1);
        assert_eq!(find(&stats.item_stats, "q2", "d").count, 2);
        assert_eq!(find(&stats.item_stats, "q1", "a").percentage, 66.7);
        assert_eq!(find(&stats.item_stats, "q1", "b").percentage, 33.3);
        // (2 + 3 + 1) / 3
        assert_eq!(stats.avg_selections, 2.0);

        let q2 = &stats.questions[1];
        assert_eq!(q2.answered, 2);
    }

    #[test]
    fn test_duplicate_selection_counts_once() {
        let responses = vec![answer(&["a", "a"], &[])];
        let stats = compute(&survey(), &responses);
        assert_eq!(find(&stats.item_stats, "q1", "a").count, 1);
    }

    #[test]
    fn test_most_selected_returns_all_ties() {
        let responses = vec![answer(&["a"], &["d"]), answer(&["b"], &["d"])];
        let stats = compute(&survey(), &responses);

        let ids: Vec<(&str, &str)> = stats
            .most_selected
            .iter()
            .map(|s| (s.question_id.as_str(), s.id.as_str()))
            .collect();
        assert_eq!(ids, vec![("q2", "d")]);

        let q1 = &stats.questions[0];
        let tied: Vec<&str> = q1.most_selected.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(tied, vec!["a", "b"]);
    }

    #[test]
    fn test_item_stats_sorted_by_count_desc() {
        let responses = vec![answer(&["c"], &[]), answer(&["c"], &[]), answer(&["b"], &[])];
        let stats = compute(&survey(), &responses);
        let counts: Vec<usize> = stats.item_stats.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0, 0]);
        assert_eq!(stats.item_stats[0].id, "c");
    }

    #[test]
    fn test_legacy_responses_count_against_migrated_question() {
        let legacy: Survey = serde_json::from_str(
            r#"{"id": "1", "title_en": "T", "title_sv": "T",
                "items": [{"id": "1", "text": "One"}, {"id": "2", "text": "Two"}]}"#,
        )
        .unwrap();
        let responses: Vec<Response> = serde_json::from_str(
            r#"[
                {"survey_id": "1", "selected_items": ["1", "2"], "timestamp": "2024-01-01T00:00:00.000Z"},
                {"survey_id": "1", "selected_items": ["2"], "timestamp": "2024-01-01T00:00:01.000Z"}
            ]"#,
        )
        .unwrap();

        let stats = compute(&legacy, &responses);
        assert_eq!(stats.item_stats[0].id, "2");
        assert_eq!(stats.item_stats[0].count, 2);
        assert_eq!(stats.item_stats[0].percentage, 100.0);
        assert_eq!(stats.item_stats[1].percentage, 50.0);
        assert_eq!(stats.avg_selections, 1.5);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(0, 0), 0.0);
    }
}
