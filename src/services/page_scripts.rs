//! 页面端脚本
//!
//! 每段脚本是一个立即执行的表达式，返回值可被 JSON 序列化。
//! 选择器只对应目标站点当前的页面结构。

use crate::messaging::ChoiceStrings;
use crate::models::LearningPath;

/// 对话框元素 id
const CHOICE_DIALOG_ID: &str = "auto-scrape-path-choice";

/// 是否处于"已完成"聚合页
pub const DETECT_AGGREGATE_VIEW: &str = r#"
(() => {
    const params = new URLSearchParams(location.search);
    return location.pathname.startsWith('/my-learning')
        && (params.get('myLearningTab') || '').toUpperCase() === 'COMPLETED';
})()
"#;

/// 聚合页上的学习路径及其课程
pub const LIST_LEARNING_PATHS: &str = r#"
(() => {
    const cards = document.querySelectorAll('[data-e2e="completed-learning-path"], [data-testid="learning-path-card"]');
    return [...cards].map((card, i) => {
        const title = card.querySelector('h2, h3')?.innerText.trim() || `Path ${i + 1}`;
        const id = card.getAttribute('data-path-id') || card.id || `path-${i + 1}`;
        const seen = new Set();
        const courses = [];
        card.querySelectorAll('a[href*="/learn/"]').forEach((a, j) => {
            const link = a.href.split('#')[0];
            if (seen.has(link)) return;
            seen.add(link);
            const slug = (link.split('/learn/')[1] || '').split(/[/?]/)[0];
            courses.push({
                id: a.getAttribute('data-course-id') || slug || `course-${j + 1}`,
                name: a.innerText.trim() || slug || link,
                link
            });
        });
        return { id, title, courses };
    });
})()
"#;

/// 读取对话框结果
///
/// 用户未操作时为 null；页面刷新或跳转后标记丢失，返回 `{ gone: true }`
pub const POLL_PATH_CHOICE: &str = r#"
(() => {
    if (window.__autoScrapePathChoice) return window.__autoScrapePathChoice;
    if (!window.__autoScrapePathChoicePending) return { gone: true };
    return null;
})()
"#;

/// 课程首个内容页
pub const LOCATE_FIRST_CONTENT: &str = r#"
(() => {
    const link = document.querySelector(
        'a[data-track-component="resume_course_button"], a[data-e2e="course-home-resume-button"], a[href*="/home/module/1"], a[href*="/home/week/1"]'
    );
    return link ? { url: link.href } : null;
})()
"#;

/// 模块页上的作业与测验，按页面顺序
pub const LIST_ASSIGNMENTS: &str = r#"
(() => {
    const seen = new Set();
    const items = [];
    document.querySelectorAll('a[href*="/quiz/"], a[href*="/exam/"], a[href*="/assignment-submission/"]').forEach(a => {
        const url = a.href.split('#')[0];
        if (seen.has(url)) return;
        seen.add(url);
        const section = a.closest('[data-testid="module-section"], section');
        const moduleName = section?.querySelector('h2, h3')?.innerText.trim() || '';
        const title = a.querySelector('[data-testid="rc-ItemName"], p')?.innerText.trim() || a.innerText.trim() || url;
        items.push({ title, moduleName, url, kind: /\/(quiz|exam)\//.test(url) ? 'Quiz' : 'Assignment' });
    });
    return items;
})()
"#;

const FIND_FEEDBACK_BUTTON: &str = r#"
const findFeedbackButton = () => {
    const byId = document.querySelector('[data-testid="view-feedback"], [data-e2e="view-feedback-button"]');
    if (byId) return byId;
    return [...document.querySelectorAll('button, a')].find(el => {
        const text = (el.innerText || '').trim().toLowerCase();
        return text.includes('view feedback') || text.includes('xem phản hồi');
    }) || null;
};
"#;

/// 题目抓取
pub const SCRAPE_QUESTIONS: &str = r#"
(() => {
    const groups = document.querySelectorAll('[data-testid="part-Submission_GradedMultipleChoiceQuestion"], [data-testid^="part-Submission_"]');
    const results = [];
    groups.forEach((group, i) => {
        const questionNumber = group.querySelector('h3 span')?.innerText.trim() || String(i + 1);
        const questionText = group.querySelector('[data-testid="legend"] .rc-CML')?.innerText.trim() || 'UNKNOWN QUESTION';
        const choices = [...group.querySelectorAll('.rc-Option label')].map(label => ({
            text: label.querySelector('.rc-CML')?.innerText.trim() || '',
            selected: label.classList.contains('cui-isChecked') || !!label.querySelector('input')?.checked
        }));
        const incorrect = group.querySelector('[data-testid*="incorrect" i], .cui-incorrect');
        results.push({ questionNumber, questionText, choices, answeredCorrectly: !incorrect });
    });
    return results;
})()
"#;

/// 是否存在反馈按钮
pub fn has_feedback_control() -> String {
    format!("(() => {{ {FIND_FEEDBACK_BUTTON} return !!findFeedbackButton(); }})()")
}

/// 点击反馈按钮，返回是否点击成功
pub fn click_feedback_control() -> String {
    format!(
        "(() => {{ {FIND_FEEDBACK_BUTTON} const el = findFeedbackButton(); if (!el) return false; el.click(); return true; }})()"
    )
}

/// 渲染路径选择对话框
///
/// 先移除已有的对话框并清空结果槽，重复调用是幂等的
pub fn present_path_choice(
    paths: &[LearningPath],
    strings: &ChoiceStrings,
) -> serde_json::Result<String> {
    let paths_json = serde_json::to_string(paths)?;
    let strings_json = serde_json::to_string(strings)?;
    Ok(format!(
        r#"
(() => {{
    const paths = {paths_json};
    const strings = {strings_json};
    document.getElementById('{CHOICE_DIALOG_ID}')?.remove();
    window.__autoScrapePathChoice = null;
    window.__autoScrapePathChoicePending = true;

    const finish = (selectedId) => {{
        window.__autoScrapePathChoice = {{ selectedId }};
        document.getElementById('{CHOICE_DIALOG_ID}')?.remove();
    }};

    const overlay = document.createElement('div');
    overlay.id = '{CHOICE_DIALOG_ID}';
    overlay.style.cssText = 'position:fixed;inset:0;background:rgba(0,0,0,.45);z-index:2147483647;display:flex;align-items:center;justify-content:center;';
    const box = document.createElement('div');
    box.style.cssText = 'background:#fff;color:#1f1f1f;border-radius:8px;padding:20px;min-width:320px;max-height:80vh;overflow:auto;font-family:sans-serif;';
    const heading = document.createElement('h3');
    heading.textContent = strings.title;
    box.appendChild(heading);

    paths.forEach(path => {{
        const button = document.createElement('button');
        button.textContent = `${{path.title}} (${{path.courses.length}} ${{strings.coursesLabel}})`;
        button.style.cssText = 'display:block;width:100%;margin:6px 0;padding:8px;text-align:left;cursor:pointer;';
        button.addEventListener('click', () => finish(path.id));
        box.appendChild(button);
    }});

    const cancel = document.createElement('button');
    cancel.textContent = strings.cancel;
    cancel.style.cssText = 'margin-top:12px;padding:6px 12px;cursor:pointer;';
    cancel.addEventListener('click', () => finish(null));
    box.appendChild(cancel);

    overlay.appendChild(box);
    document.body.appendChild(overlay);
    return true;
}})()
"#
    ))
}
