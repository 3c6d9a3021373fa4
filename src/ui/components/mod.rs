pub mod login_form;
pub mod post_composer;
pub mod post_list;
