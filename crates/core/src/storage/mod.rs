pub mod daily_posts;
