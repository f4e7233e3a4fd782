use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub error_message: Option<&'a str>,
}
