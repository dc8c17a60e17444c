use serde_json::{Value, json};

use crate::db::BlogPostInput;

/// First-run document for a default section, if one is defined.
#[must_use]
pub fn default_section(section: &str) -> Option<Value> {
    match section {
        "hero" => Some(json!({
            "title": "几何原本 - 专业汽车设计服务",
            "subtitle": "计算机辅助样式设计 | Class-A曲面开发 | 实时产品可视化 | 软件技术开发",
            "image": "/hero-car.jpg"
        })),
        "about" => Some(json!({
            "title": "关于我们 About US",
            "logo": "/images/logo_horizontal.png",
            "description": "几何原本（What Tech）前身是2017年成立的设计机构乜也设计（What Design），后因公司技术及业务发展需要更名为几何原本。创始人（黑暗森霖）与国际软件巨头其下高端工业设计品牌有长年的深入合作，主要从事计算机辅助样式设计、Class-A曲面开发、实时产品可视化及相关软件技术开发及培训。",
            "companyName": "上海几何原本科技有限公司 Shanghai What Technology Co.,Ltd"
        })),
        _ => None,
    }
}

fn body(markdown: &str) -> String {
    markdown.trim_end().to_string()
}

#[must_use]
pub fn default_blog_posts() -> Vec<BlogPostInput> {
    vec![
        BlogPostInput {
            title: "汽车设计的未来趋势".to_string(),
            excerpt: "探讨电动汽车时代的设计理念和技术创新，以及智能化、可持续发展对汽车外观设计的影响。"
                .to_string(),
            content: body(include_str!("seed_posts/future-of-car-design.md")),
            image: "/images/modeler.jpg".to_string(),
            author: "设计团队".to_string(),
            published: true,
        },
        BlogPostInput {
            title: "Class-A曲面建模技巧分享".to_string(),
            excerpt: "深入解析Class-A曲面建模的核心技术，分享专业的曲面建模方法和实战经验。"
                .to_string(),
            content: body(include_str!("seed_posts/class-a-surface-modeling.md")),
            image: "/images/developer.jpg".to_string(),
            author: "技术团队".to_string(),
            published: true,
        },
        BlogPostInput {
            title: "实时渲染技术在汽车展示中的应用".to_string(),
            excerpt: "介绍最新的实时渲染技术在汽车营销和展示中的创新应用，以及未来发展趋势。"
                .to_string(),
            content: body(include_str!("seed_posts/realtime-rendering.md")),
            image: "/images/visualization.jpg".to_string(),
            author: "可视化团队".to_string(),
            published: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_about_names_the_founder() {
        let about = default_section("about").unwrap();
        let description = about["description"].as_str().unwrap();
        assert!(description.contains("创始人（黑暗森霖）"));
        assert!(description.ends_with("相关软件技术开发及培训。"));
    }

    #[test]
    fn test_blog_bodies_are_complete() {
        let posts = default_blog_posts();
        assert_eq!(posts.len(), 3);
        for post in &posts {
            assert!(post.content.starts_with(&format!("# {}", post.title)));
            assert!(post.content.contains("## 结语"));
            assert!(!post.content.ends_with('\n'));
        }
    }
}
