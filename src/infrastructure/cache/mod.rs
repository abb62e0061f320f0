pub mod moka_figure_cache;
