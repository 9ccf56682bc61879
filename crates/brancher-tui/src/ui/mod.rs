pub(crate) mod loading;
pub(crate) mod select_list;
pub(crate) mod text;
