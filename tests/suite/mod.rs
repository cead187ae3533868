mod blocks;
mod drag_drop;
mod sprint_board;
mod undo;
